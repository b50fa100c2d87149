//! docker CLI wrapper
//!
//! Wraps the docker CLI commands the pipeline needs. Builds run in quiet
//! mode so stdout carries nothing but the image id.

use crate::error::{ContainerError, Result};
use crate::image::Image;
use convoy_core::process;
use std::path::Path;

/// docker CLI wrapper
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            program: "docker".to_string(),
        }
    }

    /// Use a different executable in place of `docker` (tests).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build an image from a context directory and return a handle to it.
    /// The id is whatever the tool prints, trimmed of whitespace.
    pub async fn build(&self, context: &Path) -> Result<Image> {
        tracing::info!("Building image from directory {}", context.display());

        let context_arg = context.display().to_string();
        let stdout = process::run(&self.program, &["build", "-q", &context_arg], None, &[]).await?;
        let id = stdout.trim().to_string();

        tracing::info!("Done building image {}", id);
        Ok(Image::new(id))
    }

    /// Apply a registry tag to an image. The tag is assigned at most once;
    /// re-tagging is rejected.
    pub async fn tag(&self, image: &mut Image, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        if image.is_tagged() {
            return Err(ContainerError::AlreadyTagged {
                id: image.id().to_string(),
                tag: image.tag().to_string(),
            });
        }

        tracing::info!("Tagging image {} with tag {}", image.id(), tag);
        process::run(&self.program, &["tag", image.id(), &tag], None, &[]).await?;
        image.set_tag(tag);
        Ok(())
    }

    /// Push an image under its tag.
    ///
    /// # Panics
    ///
    /// Panics if the image has never been tagged.
    pub async fn push(&self, image: &Image) -> Result<()> {
        let tag = image.tag();
        tracing::info!("Pushing image {}", tag);
        process::run(&self.program, &["push", tag], None, &[]).await?;
        Ok(())
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Drop a fake docker executable into a temp dir.
    fn stub_docker(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("docker");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_build_trims_printed_id() {
        let dir = tempfile::tempdir().unwrap();
        let docker = DockerCli::with_program(stub_docker(&dir, "echo '  sha256:abcdef  '"));

        let image = docker.build(Path::new(".")).await.unwrap();
        assert_eq!(image.id(), "sha256:abcdef");
        assert!(!image.is_tagged());
    }

    #[tokio::test]
    async fn test_build_failure_carries_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let docker = DockerCli::with_program(stub_docker(&dir, "echo boom >&2; exit 1"));

        let err = docker.build(Path::new(".")).await.unwrap_err();
        match err {
            ContainerError::Core(convoy_core::ConvoyError::CommandFailed { code, stderr }) => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tag_is_single_assignment() {
        let docker = DockerCli::with_program("true");
        let mut image = Image::prebuilt("postgres:13");

        docker
            .tag(&mut image, "cr.yandex/reg/postgres:latest")
            .await
            .unwrap();
        assert_eq!(image.tag(), "cr.yandex/reg/postgres:latest");

        let err = docker
            .tag(&mut image, "cr.yandex/reg/postgres:other")
            .await
            .unwrap_err();
        assert!(matches!(err, ContainerError::AlreadyTagged { .. }));
        // the first tag survives
        assert_eq!(image.tag(), "cr.yandex/reg/postgres:latest");
    }

    #[tokio::test]
    async fn test_failed_tag_leaves_image_untagged() {
        let docker = DockerCli::with_program("false");
        let mut image = Image::prebuilt("postgres:13");

        let err = docker
            .tag(&mut image, "cr.yandex/reg/postgres:latest")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ContainerError::Core(convoy_core::ConvoyError::CommandFailed { .. })
        ));
        assert!(!image.is_tagged());
    }

    #[tokio::test]
    #[should_panic(expected = "image must be tagged first")]
    async fn test_push_untagged_is_a_programmer_error() {
        let docker = DockerCli::with_program("true");
        let image = Image::prebuilt("postgres:13");
        let _ = docker.push(&image).await;
    }
}
