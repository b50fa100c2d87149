use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    #[error(transparent)]
    Core(#[from] convoy_core::ConvoyError),
}

pub type Result<T> = std::result::Result<T, CloudError>;
