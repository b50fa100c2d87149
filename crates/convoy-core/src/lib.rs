//! Convoy core functionality
//!
//! The pieces every other convoy crate builds on: the configuration
//! contract, external command execution, template rendering, and the
//! shared error type.

pub mod config;
pub mod error;
pub mod process;
pub mod template;

pub use config::{Config, ParamKind, ParamSpec, PARAMS};
pub use error::{ConvoyError, Result};
