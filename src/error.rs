use crate::config::ConfigError;
use crate::value::StoreError;
use thiserror::Error;

/// Top-level error type for the dynstore library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("application context requires a configuration")]
    MissingConfig,
}
