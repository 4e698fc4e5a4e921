//! Error types for storage access and value encoding.
//!
//! None of these escape a binding: the binding layer logs them and degrades to
//! `None` or a no-op. The lower-level helpers return them so callers and tests
//! can observe exactly what went wrong.

use crate::backend::StorageArea;

/// Failure reported by a [`StorageBackend`](crate::backend::StorageBackend).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The browser refused access to the storage area (privacy mode, sandboxed frame).
    #[error("{0} storage is unavailable")]
    Unavailable(StorageArea),
    /// A storage call threw; carries the JS error rendered as text.
    #[error("storage call failed: {0}")]
    Js(String),
}

/// Failure converting between a value and its stored text form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The value could not be turned into text.
    #[error("failed to encode value: {0}")]
    Encode(String),
    /// The stored text could not be turned back into a value.
    #[error("failed to decode stored value: {0}")]
    Decode(String),
}

/// Error returned by [`write_value`](crate::writer::write_value).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
