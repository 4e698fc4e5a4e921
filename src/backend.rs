//! Key-value storage backends.
//!
//! SYSTEM CONTEXT
//! ==============
//! Bindings never touch `window.localStorage` directly. They receive a
//! [`StorageBackend`] so the same load/write logic runs against the browser,
//! against a detached no-op store during server rendering, and against an
//! in-memory map in native tests.
//!
//! TRADE-OFFS
//! ==========
//! Browser storage is best-effort: when the browser denies access we fall back
//! to [`DetachedStorage`] and log, rather than failing the component.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::StorageError;

/// Which browser storage area a binding targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageArea {
    /// `window.localStorage`: survives reloads, shared by same-origin tabs.
    Local,
    /// `window.sessionStorage`: scoped to one tab session.
    Session,
}

impl StorageArea {
    /// Whether other browsing contexts can observe writes to this area.
    #[must_use]
    pub fn is_shared(self) -> bool {
        matches!(self, Self::Local)
    }
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Session => "session",
        })
    }
}

/// Synchronous string key-value store.
pub trait StorageBackend {
    /// Raw text stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Store `value` under `key`, replacing any previous record.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Delete the record under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend. Clones share the same map, so a test can hold one clone
/// while a binding holds another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    writes: Rc<Cell<usize>>,
    reject_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record under `key`, bypassing the write counter.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Seed a raw record without counting it as a write.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    /// Number of `set`/`remove` calls that reached this store.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Make subsequent `set` calls fail the way a full browser quota does.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes.get() {
            return Err(StorageError::Js("QuotaExceededError".to_owned()));
        }
        self.writes.set(self.writes.get() + 1);
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.writes.set(self.writes.get() + 1);
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Backend used when no browser storage exists (SSR, denied access).
/// Reads find nothing and writes are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedStorage;

impl StorageBackend for DetachedStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// `window.localStorage` / `window.sessionStorage` via web-sys.
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    area: StorageArea,
    storage: web_sys::Storage,
}

#[cfg(feature = "hydrate")]
impl BrowserStorage {
    /// Resolve the storage object for `area` from the current window.
    pub fn open(area: StorageArea) -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable(area))?;
        let storage = match area {
            StorageArea::Local => window.local_storage(),
            StorageArea::Session => window.session_storage(),
        }
        .map_err(js_error)?
        .ok_or(StorageError::Unavailable(area))?;
        Ok(Self { area, storage })
    }

    #[must_use]
    pub fn area(&self) -> StorageArea {
        self.area
    }

    pub(crate) fn storage(&self) -> &web_sys::Storage {
        &self.storage
    }
}

#[cfg(feature = "hydrate")]
impl StorageBackend for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

#[cfg(feature = "hydrate")]
fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Js(format!("{err:?}"))
}

/// Backend for `area` in the current environment.
///
/// Under `hydrate` this is the browser store; when the browser denies access,
/// and always during server rendering, it is [`DetachedStorage`].
pub fn open_backend(area: StorageArea) -> Rc<dyn StorageBackend> {
    #[cfg(feature = "hydrate")]
    {
        match BrowserStorage::open(area) {
            Ok(storage) => Rc::new(storage),
            Err(err) => {
                leptos::logging::warn!("storage: {area} storage unavailable, using detached store: {err}");
                Rc::new(DetachedStorage)
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _area = area;
        Rc::new(DetachedStorage)
    }
}
