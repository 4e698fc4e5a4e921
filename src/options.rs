//! Per-binding configuration.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::Codec;

/// Whether local bindings follow writes from other tabs unless told otherwise.
pub const DEFAULT_SYNC_ACROSS_CONTEXTS: bool = true;

/// Options accepted by the binding entry points.
///
/// `BindOptions::default()` uses the JSON codec, no default value, and
/// cross-tab sync on. Types without serde impls start from
/// [`BindOptions::new`] with their own codec.
#[derive(Clone, Debug)]
pub struct BindOptions<T> {
    /// Value adopted and persisted when nothing usable is stored.
    pub default_value: Option<T>,
    pub codec: Codec<T>,
    /// Mirror `storage` events from other tabs. Ignored by session bindings.
    pub sync_across_contexts: bool,
}

impl<T> BindOptions<T> {
    pub fn new(codec: Codec<T>) -> Self {
        Self {
            default_value: None,
            codec,
            sync_across_contexts: DEFAULT_SYNC_ACROSS_CONTEXTS,
        }
    }

    #[must_use]
    pub fn default_value(mut self, value: T) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn codec(mut self, codec: Codec<T>) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn sync_across_contexts(mut self, enabled: bool) -> Self {
        self.sync_across_contexts = enabled;
        self
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Default for BindOptions<T> {
    fn default() -> Self {
        Self::new(Codec::json())
    }
}
