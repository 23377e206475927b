use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading configuration into a store or reading it back out.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file {0} is required but does not exist")]
    FileNotFound(PathBuf),

    #[error("config directory {0} is required but does not exist")]
    DirNotFound(PathBuf),

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The extension is not one of `.toml`, `.json`, `.yml` or `.yaml`.
    #[error("{0} is not a .toml, .json or .yml file")]
    UnsupportedFormat(PathBuf),

    #[error("{0} does not hold a mapping at its top level")]
    NotATable(PathBuf),

    /// A subtree could not be decoded into the requested Rust type.
    #[error("cannot decode stored value: {0}")]
    DeserializeError(#[from] serde_json::Error),

    #[error("configuration references form a cycle")]
    CircularReference,

    #[error("reference ${{{0}}} points at nothing")]
    ReferenceNotFound(String),

    #[error("malformed reference path {0:?}")]
    InvalidReferencePath(String),

    #[error("reference ${{{0}}} points at a container, not a scalar")]
    NonScalarReference(String),

    #[error("reference is missing its closing '}}'")]
    UnclosedReference,
}
