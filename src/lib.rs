//! Leptos signals persisted to browser storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components call [`use_local_storage`] or [`use_session_storage`] to get a
//! signal whose value is read from storage on mount and written back on every
//! update. Local bindings also follow writes made by other same-origin tabs.
//!
//! ```ignore
//! let width = use_local_storage("left_panel_width", BindOptions::default().default_value(160_u32));
//! width.update_with(|prev| prev.map(|w| w + 20));
//! ```
//!
//! Everything below the entry points (backends, codecs, loader, writer,
//! change sources) is public so hosts can plug in their own storage.

pub mod backend;
pub mod binding;
pub mod codec;
pub mod error;
pub mod loader;
pub mod notify;
pub mod options;
pub mod request;
pub mod writer;

pub use backend::{DetachedStorage, MemoryStorage, StorageArea, StorageBackend, open_backend};
#[cfg(feature = "hydrate")]
pub use backend::BrowserStorage;
pub use binding::{StorageBinding, StorageSetter, bind_storage, use_local_storage, use_session_storage};
pub use codec::Codec;
pub use error::{CodecError, PersistError, StorageError};
pub use loader::{LoadOrigin, Loaded, load_initial};
#[cfg(feature = "hydrate")]
pub use notify::WindowStorageEvents;
pub use notify::{ChangeHub, ChangeListener, ChangeSource, StorageChange, Subscription};
pub use options::BindOptions;
pub use request::{UpdateRequest, compute_next};
pub use writer::write_value;
