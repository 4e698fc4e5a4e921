//! Signal bindings to browser storage.
//!
//! ARCHITECTURE
//! ============
//! A binding owns one `RwSignal<Option<T>>` mirrored to one storage key.
//! There are two ways into that signal:
//!
//! - **local intent**: `update` resolves the request, writes the backend, and
//!   only then sets the signal. This is the path other tabs get to observe.
//! - **external fact**: a `storage` event from another tab decodes the new
//!   record and sets the signal directly. The write already happened
//!   elsewhere, so nothing is written back.
//!
//! The entry points read storage on mount, not while the component body runs.
//! In the browser the read happens in an `Effect`, so the first client render
//! matches the server HTML (`None`, `loading == true`). During server
//! rendering there is no storage to read and the binding stays loading.
//!
//! TRADE-OFFS
//! ==========
//! Failures never reach the caller. A bad record, an unencodable value, or a
//! full quota is logged and degrades to `None` or a no-op, so the consumer
//! cannot tell "absent" from "failed to load".

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use std::rc::Rc;

use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use crate::backend::BrowserStorage;
use crate::backend::{DetachedStorage, StorageArea, StorageBackend, open_backend};
use crate::codec::Codec;
use crate::loader::load_initial;
#[cfg(feature = "hydrate")]
use crate::notify::WindowStorageEvents;
use crate::notify::{ChangeListener, ChangeSource, StorageChange, Subscription};
use crate::options::BindOptions;
use crate::request::{UpdateRequest, compute_next};
use crate::writer::write_value;

/// When a binding performs its initial read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Activation {
    /// While the binding is constructed.
    Immediate,
    /// In an effect, once the owning component has mounted.
    OnMount,
    /// Not on this side: the value stays `None` and `loading` stays `true`.
    Deferred,
}

impl Activation {
    /// Timing the public entry points use in the current build.
    fn for_entry_point() -> Self {
        if cfg!(feature = "hydrate") {
            Self::OnMount
        } else if cfg!(feature = "ssr") {
            Self::Deferred
        } else {
            Self::Immediate
        }
    }
}

struct Shared<T: Send + Sync + 'static> {
    key: String,
    backend: Rc<dyn StorageBackend>,
    codec: Codec<T>,
    default_value: Option<T>,
    value: RwSignal<Option<T>>,
    loading: RwSignal<bool>,
}

impl<T: Clone + Send + Sync + 'static> Shared<T> {
    fn load(&self) {
        let loaded = load_initial(self.backend.as_ref(), &self.key, self.default_value.as_ref(), &self.codec);
        self.value.set(loaded.value);
        self.loading.set(false);
    }
}

/// Update half of a binding.
pub struct StorageSetter<T: Send + Sync + 'static> {
    shared: StoredValue<Rc<Shared<T>>, LocalStorage>,
}

impl<T: Send + Sync + 'static> Clone for StorageSetter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for StorageSetter<T> {}

impl<T: Clone + Send + Sync + 'static> StorageSetter<T> {
    /// Resolve `request` against the current value, persist it, then publish it.
    ///
    /// If persisting fails the signal keeps its previous value.
    pub fn update(&self, request: impl Into<UpdateRequest<T>>) {
        let Some(shared) = self.shared.try_get_value() else {
            leptos::logging::warn!("storage: update ignored, binding already disposed");
            return;
        };
        let next = compute_next(request.into(), shared.value.get_untracked());
        match write_value(shared.backend.as_ref(), &shared.key, next, &shared.codec) {
            Ok(adopted) => shared.value.set(adopted),
            Err(err) => leptos::logging::warn!("storage: update for key={} not persisted: {err}", shared.key),
        }
    }

    pub fn set(&self, value: T) {
        self.update(UpdateRequest::Set(value));
    }

    /// Drop the value and remove the record.
    pub fn clear(&self) {
        self.update(UpdateRequest::Clear);
    }

    /// Derive the next value from the current one.
    pub fn update_with(&self, f: impl FnOnce(Option<T>) -> Option<T> + 'static) {
        self.update(UpdateRequest::with(f));
    }

    /// Storage key this setter writes to, or `None` once the owning reactive
    /// scope has been disposed.
    pub fn key(&self) -> Option<String> {
        self.shared.try_with_value(|shared| shared.key.clone())
    }
}

/// A signal mirrored to one storage key. `Copy`, like the signals it wraps.
pub struct StorageBinding<T: Send + Sync + 'static> {
    value: ReadSignal<Option<T>>,
    loading: ReadSignal<bool>,
    setter: StorageSetter<T>,
}

impl<T: Send + Sync + 'static> Clone for StorageBinding<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for StorageBinding<T> {}

impl<T: Clone + Send + Sync + 'static> StorageBinding<T> {
    /// Read-only view of the current value.
    pub fn value(&self) -> ReadSignal<Option<T>> {
        self.value
    }

    /// `true` until the initial read has resolved. Stays `true` during
    /// server rendering, where no read happens.
    pub fn loading(&self) -> ReadSignal<bool> {
        self.loading
    }

    /// Current value, tracked.
    pub fn get(&self) -> Option<T> {
        self.value.get()
    }

    pub fn get_untracked(&self) -> Option<T> {
        self.value.get_untracked()
    }

    /// See [`StorageSetter::key`].
    pub fn key(&self) -> Option<String> {
        self.setter.key()
    }

    pub fn setter(&self) -> StorageSetter<T> {
        self.setter
    }

    /// See [`StorageSetter::update`].
    pub fn update(&self, request: impl Into<UpdateRequest<T>>) {
        self.setter.update(request);
    }

    pub fn set(&self, value: T) {
        self.setter.set(value);
    }

    pub fn clear(&self) {
        self.setter.clear();
    }

    pub fn update_with(&self, f: impl FnOnce(Option<T>) -> Option<T> + 'static) {
        self.setter.update_with(f);
    }

    /// `(value, setter, loading)`, for destructuring at the call site.
    pub fn split(self) -> (ReadSignal<Option<T>>, StorageSetter<T>, ReadSignal<bool>) {
        (self.value, self.setter, self.loading)
    }
}

/// Bind `key` in `localStorage`, following writes made by other tabs.
///
/// The initial read runs after mount. During server rendering the binding is
/// left loading with no value. When the browser denies storage access it falls
/// back to a detached store (defaults only, nothing persisted).
pub fn use_local_storage<T>(key: impl Into<String>, options: BindOptions<T>) -> StorageBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[cfg(feature = "hydrate")]
    {
        match BrowserStorage::open(StorageArea::Local) {
            Ok(storage) => {
                let events = WindowStorageEvents::new(storage.clone());
                let changes: &dyn ChangeSource = &events;
                return bind_with(Rc::new(storage), Some(changes), key, options, Activation::for_entry_point());
            }
            Err(err) => {
                leptos::logging::warn!("storage: {} storage unavailable, using detached store: {err}", StorageArea::Local);
            }
        }
    }
    bind_with(Rc::new(DetachedStorage), None, key, options, Activation::for_entry_point())
}

/// Bind `key` in `sessionStorage`. Session storage is per tab, so there is
/// nothing to follow.
pub fn use_session_storage<T>(key: impl Into<String>, options: BindOptions<T>) -> StorageBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    bind_with(open_backend(StorageArea::Session), None, key, options, Activation::for_entry_point())
}

/// Bind `key` in an arbitrary backend.
///
/// Loads the initial value synchronously, so it suits hosts without a
/// hydration step. When `changes` is given and `options.sync_across_contexts`
/// is on, it subscribes for the lifetime of the current reactive owner.
pub fn bind_storage<T>(
    backend: Rc<dyn StorageBackend>,
    changes: Option<&dyn ChangeSource>,
    key: impl Into<String>,
    options: BindOptions<T>,
) -> StorageBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    bind_with(backend, changes, key, options, Activation::Immediate)
}

pub(crate) fn bind_with<T>(
    backend: Rc<dyn StorageBackend>,
    changes: Option<&dyn ChangeSource>,
    key: impl Into<String>,
    options: BindOptions<T>,
    activation: Activation,
) -> StorageBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    let key = key.into();
    let BindOptions { default_value, codec, sync_across_contexts } = options;

    let value = RwSignal::new(None::<T>);
    let loading = RwSignal::new(true);

    if sync_across_contexts {
        if let Some(changes) = changes {
            let subscription = changes.subscribe(change_listener(key.clone(), codec.clone(), value));
            unsubscribe_on_cleanup(subscription);
        }
    }

    let shared = Rc::new(Shared { key, backend, codec, default_value, value, loading });
    match activation {
        Activation::Immediate => shared.load(),
        Activation::OnMount => load_on_mount(Rc::clone(&shared)),
        Activation::Deferred => {}
    }

    StorageBinding {
        value: value.read_only(),
        loading: loading.read_only(),
        setter: StorageSetter { shared: StoredValue::new_local(shared) },
    }
}

#[cfg(feature = "hydrate")]
fn load_on_mount<T: Clone + Send + Sync + 'static>(shared: Rc<Shared<T>>) {
    Effect::new(move || shared.load());
}

// Effects only run in the browser; elsewhere there is no mount to wait for.
#[cfg(not(feature = "hydrate"))]
fn load_on_mount<T: Clone + Send + Sync + 'static>(shared: Rc<Shared<T>>) {
    shared.load();
}

fn unsubscribe_on_cleanup(subscription: Subscription) {
    let slot = StoredValue::new_local(subscription);
    on_cleanup(move || {
        slot.try_update_value(Subscription::cancel);
    });
}

fn change_listener<T>(key: String, codec: Codec<T>, value: RwSignal<Option<T>>) -> ChangeListener
where
    T: Send + Sync + 'static,
{
    Rc::new(move |change: &StorageChange| {
        if !change.affects(&key) {
            return;
        }
        match change.new_value.as_deref() {
            None => value.set(None),
            Some(raw) => match codec.decode(raw) {
                Ok(next) => value.set(Some(next)),
                Err(err) => leptos::logging::warn!("storage: ignoring malformed change for key={key}: {err}"),
            },
        }
    })
}
