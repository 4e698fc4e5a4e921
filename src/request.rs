//! Update requests and next-value resolution.
//!
//! DESIGN
//! ======
//! A request says explicitly whether it sets, clears, or derives the next
//! value. `0`, `false` and other zero-like literals are ordinary values here;
//! only [`UpdateRequest::Clear`] (or `None`) removes the record.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use std::fmt;

type Updater<T> = Box<dyn FnOnce(Option<T>) -> Option<T>>;

/// What an `update` call asks the binding to do.
pub enum UpdateRequest<T> {
    /// Replace the value.
    Set(T),
    /// Drop the value and remove the stored record.
    Clear,
    /// Derive the next value from the previous one.
    Update(Updater<T>),
}

impl<T> UpdateRequest<T> {
    /// Wrap an updater closure.
    pub fn with<F>(f: F) -> Self
    where
        F: FnOnce(Option<T>) -> Option<T> + 'static,
    {
        Self::Update(Box::new(f))
    }
}

impl<T> From<Option<T>> for UpdateRequest<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for UpdateRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(value) => f.debug_tuple("Set").field(value).finish(),
            Self::Clear => f.write_str("Clear"),
            Self::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// Resolve `request` against the previously held value.
pub fn compute_next<T>(request: UpdateRequest<T>, previous: Option<T>) -> Option<T> {
    match request {
        UpdateRequest::Update(f) => f(previous),
        UpdateRequest::Clear => None,
        UpdateRequest::Set(value) => Some(value),
    }
}
