//! Value <-> text conversion for stored records.
//!
//! A [`Codec`] is the serializer/deserializer pair a binding uses. JSON via
//! `serde_json` is the default; callers can swap in any pair of closures.
//! Each codec also decides which encodings count as "empty" so the writer can
//! turn them into key removal instead of storing them.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

type EncodeFn<T> = Rc<dyn Fn(&T) -> Result<String, CodecError>>;
type DecodeFn<T> = Rc<dyn Fn(&str) -> Result<T, CodecError>>;

/// Serializer/deserializer pair for one value type.
pub struct Codec<T> {
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
    blank: fn(&str) -> bool,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            encode: Rc::clone(&self.encode),
            decode: Rc::clone(&self.decode),
            blank: self.blank,
        }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

impl<T> Codec<T> {
    /// Custom codec. Only an empty encoding is treated as blank.
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&T) -> Result<String, CodecError> + 'static,
        D: Fn(&str) -> Result<T, CodecError> + 'static,
    {
        Self {
            encode: Rc::new(encode),
            decode: Rc::new(decode),
            blank: str::is_empty,
        }
    }

    pub fn encode(&self, value: &T) -> Result<String, CodecError> {
        (self.encode)(value)
    }

    pub fn decode(&self, raw: &str) -> Result<T, CodecError> {
        (self.decode)(raw)
    }

    /// Whether `encoded` represents an empty value that must not be stored.
    #[must_use]
    pub fn is_blank(&self, encoded: &str) -> bool {
        (self.blank)(encoded)
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Codec<T> {
    /// JSON text via `serde_json`. `null` and `""` count as blank.
    #[must_use]
    pub fn json() -> Self {
        Self {
            encode: Rc::new(|value: &T| serde_json::to_string(value).map_err(|err| CodecError::Encode(err.to_string()))),
            decode: Rc::new(|raw: &str| serde_json::from_str(raw).map_err(|err| CodecError::Decode(err.to_string()))),
            blank: json_is_blank,
        }
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Default for Codec<T> {
    fn default() -> Self {
        Self::json()
    }
}

impl Codec<String> {
    /// Stores strings verbatim, for records shared with code that does not
    /// speak JSON (e.g. a `"true"`/`"false"` flag).
    #[must_use]
    pub fn plain() -> Self {
        Self::new(|value: &String| Ok(value.clone()), |raw: &str| Ok(raw.to_owned()))
    }
}

fn json_is_blank(encoded: &str) -> bool {
    matches!(encoded.trim(), "" | "null" | "\"\"")
}
