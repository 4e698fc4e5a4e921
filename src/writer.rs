//! Persisting a resolved value.

#[cfg(test)]
#[path = "writer_test.rs"]
mod writer_test;

use crate::backend::StorageBackend;
use crate::codec::Codec;
use crate::error::PersistError;

/// Store `value` under `key`, or remove the key when the value is empty.
///
/// Returns the value the caller should now hold: `Some(value)` after a write,
/// `None` after a removal. On error nothing was written and the caller must
/// keep its previous value.
pub fn write_value<T>(
    backend: &dyn StorageBackend,
    key: &str,
    value: Option<T>,
    codec: &Codec<T>,
) -> Result<Option<T>, PersistError> {
    let Some(value) = value else {
        backend.remove(key)?;
        return Ok(None);
    };

    let encoded = codec.encode(&value)?;
    if codec.is_blank(&encoded) {
        backend.remove(key)?;
        return Ok(None);
    }

    backend.set(key, &encoded)?;
    Ok(Some(value))
}
