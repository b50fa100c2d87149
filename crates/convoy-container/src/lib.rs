//! Convoy container image handling
//!
//! Drives the docker CLI through the image lifecycle the deployment
//! pipeline needs: quiet build, tag, push. The docker daemon's API is an
//! implementation detail of the CLI; only exit codes matter here.

pub mod docker;
pub mod error;
pub mod image;

pub use docker::DockerCli;
pub use error::{ContainerError, Result};
pub use image::Image;
