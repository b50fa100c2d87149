use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvoyError {
    #[error("command exited with code {code}\nstderr: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("failed to launch '{command}': {source}")]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("invalid value for ${key}: expected {expected}, got '{value}'")]
    InvalidParameter {
        key: String,
        expected: &'static str,
        value: String,
    },

    #[error("could not read input for ${key}: {source}")]
    Prompt {
        key: String,
        source: std::io::Error,
    },

    #[error("template error: {file}\nreason: {message}")]
    Template { file: PathBuf, message: String },

    #[error("I/O error: {path}\nreason: {message}")]
    Io { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ConvoyError>;
