//! Cross-context change notifications.
//!
//! SYSTEM CONTEXT
//! ==============
//! When another tab writes to `localStorage`, the browser fires a `storage`
//! event in every other same-origin tab. Bindings subscribe through the
//! [`ChangeSource`] trait so tests can raise the same notifications from a
//! [`ChangeHub`] without a browser.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

#[cfg(feature = "hydrate")]
use crate::backend::{BrowserStorage, StorageArea};
#[cfg(feature = "hydrate")]
use crate::error::StorageError;

/// One external mutation of the storage area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    /// Key that changed; `None` when the whole area was cleared.
    pub key: Option<String>,
    /// New raw record; `None` when removed.
    pub new_value: Option<String>,
}

impl StorageChange {
    /// `key` now holds `raw`.
    pub fn set(key: impl Into<String>, raw: impl Into<String>) -> Self {
        Self { key: Some(key.into()), new_value: Some(raw.into()) }
    }

    /// `key` was removed.
    pub fn removed(key: impl Into<String>) -> Self {
        Self { key: Some(key.into()), new_value: None }
    }

    /// Every key was removed (`storage.clear()`).
    #[must_use]
    pub fn cleared() -> Self {
        Self { key: None, new_value: None }
    }

    /// Whether this change touches the record under `key`.
    #[must_use]
    pub fn affects(&self, key: &str) -> bool {
        self.key.as_deref().map_or(true, |changed| changed == key)
    }
}

pub type ChangeListener = Rc<dyn Fn(&StorageChange)>;

/// Source of [`StorageChange`] notifications.
pub trait ChangeSource {
    /// Register `listener` until the returned [`Subscription`] is cancelled or dropped.
    fn subscribe(&self, listener: ChangeListener) -> Subscription;
}

/// Registration handle. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Unsubscribe now. Later calls do nothing.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

type ListenerList = RefCell<Vec<(u64, ChangeListener)>>;

/// In-process broadcast of storage changes. Clones share listeners.
#[derive(Clone, Default)]
pub struct ChangeHub {
    listeners: Rc<ListenerList>,
    next_id: Rc<Cell<u64>>,
}

impl ChangeHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `change` to every current listener.
    pub fn emit(&self, change: &StorageChange) {
        // Snapshot so listeners may subscribe or unsubscribe while being called.
        let listeners: Vec<ChangeListener> = self.listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener(change);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for ChangeHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeHub").field("listeners", &self.listener_count()).finish()
    }
}

impl ChangeSource for ChangeHub {
    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));

        let listeners: Weak<ListenerList> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(registered, _)| *registered != id);
            }
        })
    }
}

/// Whether an event raised on `event_area` concerns the `bound` store.
///
/// Browsers fire `storage` for both areas on the same window; an event that
/// names no area is kept.
#[cfg(any(feature = "hydrate", test))]
pub(crate) fn from_bound_area<S: PartialEq>(event_area: Option<&S>, bound: &S) -> bool {
    event_area.map_or(true, |area| area == bound)
}

/// The window `storage` event, restricted to one storage area.
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug)]
pub struct WindowStorageEvents {
    storage: BrowserStorage,
}

#[cfg(feature = "hydrate")]
impl WindowStorageEvents {
    #[must_use]
    pub fn new(storage: BrowserStorage) -> Self {
        Self { storage }
    }

    pub fn open(area: StorageArea) -> Result<Self, StorageError> {
        BrowserStorage::open(area).map(Self::new)
    }
}

#[cfg(feature = "hydrate")]
impl ChangeSource for WindowStorageEvents {
    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        let storage = self.storage.clone();
        let handle = leptos::prelude::window_event_listener(leptos::ev::storage, move |ev: web_sys::StorageEvent| {
            if !from_bound_area(ev.storage_area().as_ref(), storage.storage()) {
                return;
            }
            listener(&StorageChange { key: ev.key(), new_value: ev.new_value() });
        });
        Subscription::new(move || handle.remove())
    }
}
