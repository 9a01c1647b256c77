use thiserror::Error;

/// Contract violations. Missing images and failed writes are not errors;
/// they are logged and folded into the returned comparison.
#[derive(Error, Debug, PartialEq)]
pub enum CompareError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
