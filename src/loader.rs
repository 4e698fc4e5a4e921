//! Initial read of a binding's record.
//!
//! Runs once per binding activation. Stored data wins over the default; a
//! record that fails to decode is removed and treated as missing; a default
//! is written back only when no usable record existed.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use crate::backend::StorageBackend;
use crate::codec::Codec;

/// Where the initial value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Decoded from an existing record.
    Stored,
    /// The caller's default, now persisted.
    Default,
    /// Nothing usable; the value is `None`.
    Empty,
}

/// Result of [`load_initial`]. Always resolved; failures degrade to `Empty`.
#[derive(Clone, Debug, PartialEq)]
pub struct Loaded<T> {
    pub value: Option<T>,
    pub origin: LoadOrigin,
}

impl<T> Loaded<T> {
    fn empty() -> Self {
        Self { value: None, origin: LoadOrigin::Empty }
    }
}

/// Read `key` from `backend`, falling back to `default`.
pub fn load_initial<T: Clone>(
    backend: &dyn StorageBackend,
    key: &str,
    default: Option<&T>,
    codec: &Codec<T>,
) -> Loaded<T> {
    let raw = match backend.get(key) {
        Ok(raw) => raw,
        Err(err) => {
            leptos::logging::warn!("storage: read failed for key={key}: {err}");
            None
        }
    };

    if let Some(raw) = raw {
        match codec.decode(&raw) {
            Ok(value) => return Loaded { value: Some(value), origin: LoadOrigin::Stored },
            Err(err) => {
                leptos::logging::warn!("storage: discarding malformed record for key={key}: {err}");
                if let Err(err) = backend.remove(key) {
                    leptos::logging::warn!("storage: failed to remove malformed record for key={key}: {err}");
                }
            }
        }
    }

    let Some(default) = default else {
        return Loaded::empty();
    };
    let encoded = match codec.encode(default) {
        Ok(encoded) => encoded,
        Err(err) => {
            leptos::logging::warn!("storage: default for key={key} not persisted: {err}");
            return Loaded::empty();
        }
    };
    if codec.is_blank(&encoded) {
        return Loaded::empty();
    }
    if let Err(err) = backend.set(key, &encoded) {
        leptos::logging::warn!("storage: default for key={key} not persisted: {err}");
        return Loaded::empty();
    }
    Loaded { value: Some(default.clone()), origin: LoadOrigin::Default }
}
