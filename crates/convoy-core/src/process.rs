//! External command execution
//!
//! Every tool the pipeline drives (docker, terraform) goes through here.
//! Success is decided by the exit code alone; the content of stdout and
//! stderr is never inspected. No retries, no timeouts: a hung tool hangs
//! the pipeline, and timeout policy belongs to the operator.

use crate::error::{ConvoyError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Run a command with captured output and return its stdout.
///
/// stderr is captured as well; on a nonzero exit it is carried inside the
/// returned [`ConvoyError::CommandFailed`] as the operator's diagnostic.
pub async fn run(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    envs: &[(String, String)],
) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::info!("Running: {} {}", program, args.join(" "));

    let output = cmd.output().await.map_err(|e| ConvoyError::CommandSpawn {
        command: program.to_string(),
        source: e,
    })?;

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        tracing::error!("Command failed with code {} and stderr {}", code, stderr);
        return Err(ConvoyError::CommandFailed { code, stderr });
    }

    tracing::info!("Command finished with code 0 and stderr {}", stderr);
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run a command with stdout/stderr passed through to the controlling
/// terminal. Nothing is captured; the return value carries no output.
pub async fn run_interactive(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    envs: &[(String, String)],
) -> Result<()> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    tracing::info!("Running (interactive): {} {}", program, args.join(" "));

    let status = cmd.status().await.map_err(|e| ConvoyError::CommandSpawn {
        command: program.to_string(),
        source: e,
    })?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        tracing::error!("Command failed with code {}", code);
        return Err(ConvoyError::CommandFailed {
            code,
            stderr: String::new(),
        });
    }

    tracing::info!("Command finished with code 0");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_returns_stdout() {
        let out = run("sh", &["-c", "echo hello"], None, &[]).await.unwrap();
        assert_eq!(out, "hello\n");
    }

    #[tokio::test]
    async fn test_run_carries_exit_code_and_stderr() {
        let err = run("sh", &["-c", "echo boom >&2; exit 1"], None, &[])
            .await
            .unwrap_err();
        match err {
            ConvoyError::CommandFailed { code, stderr } => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_in_working_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = run("pwd", &[], Some(temp_dir.path()), &[]).await.unwrap();
        // /tmp may be a symlink, so compare canonical paths
        let reported = std::fs::canonicalize(out.trim()).unwrap();
        let expected = std::fs::canonicalize(temp_dir.path()).unwrap();
        assert_eq!(reported, expected);
    }

    #[tokio::test]
    async fn test_run_injects_environment() {
        let envs = vec![("CONVOY_TEST_VAR".to_string(), "42".to_string())];
        let out = run("sh", &["-c", "printf '%s' \"$CONVOY_TEST_VAR\""], None, &envs)
            .await
            .unwrap();
        assert_eq!(out, "42");
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let err = run("convoy-no-such-program", &[], None, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ConvoyError::CommandSpawn { .. }));
    }

    #[tokio::test]
    async fn test_run_interactive_checks_exit_code() {
        assert!(run_interactive("true", &[], None, &[]).await.is_ok());

        let err = run_interactive("false", &[], None, &[]).await.unwrap_err();
        match err {
            ConvoyError::CommandFailed { code, stderr } => {
                assert_eq!(code, 1);
                assert!(stderr.is_empty());
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }
}
