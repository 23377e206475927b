use thiserror::Error;

use super::Value;

/// A write rejected by [`try_set`](super::try_set).
///
/// The root passed in is returned untouched inside the error; recover it with
/// [`into_root`](Self::into_root).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("index {index} out of range for sequence of length {len} at '{path}'")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
        root: Box<Value>,
    },

    #[error("segment '{segment}' is not a sequence index at '{path}'")]
    InvalidIndex {
        path: String,
        segment: String,
        root: Box<Value>,
    },
}

impl StoreError {
    /// Returns the root the rejected write was given.
    pub fn into_root(self) -> Value {
        match self {
            StoreError::IndexOutOfRange { root, .. } | StoreError::InvalidIndex { root, .. } => *root,
        }
    }

    /// Moves the root out of the error, leaving `Nil` in its place.
    pub fn take_root(&mut self) -> Value {
        match self {
            StoreError::IndexOutOfRange { root, .. } | StoreError::InvalidIndex { root, .. } => {
                std::mem::take(&mut **root)
            }
        }
    }

    /// The path prefix that addresses the offending sequence element.
    pub fn path(&self) -> &str {
        match self {
            StoreError::IndexOutOfRange { path, .. } | StoreError::InvalidIndex { path, .. } => path,
        }
    }
}
