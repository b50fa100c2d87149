use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error(transparent)]
    Core(#[from] convoy_core::ConvoyError),

    #[error("image {id} is already tagged as {tag}")]
    AlreadyTagged { id: String, tag: String },
}

pub type Result<T> = std::result::Result<T, ContainerError>;
