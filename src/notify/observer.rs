//! Observer trait, key filters and a closure-backed observer.

use std::collections::BTreeSet;
use std::fmt;

/// An event that can be routed by key
pub trait ChangeEvent {
    /// Key observers filter on (e.g. a config setting name)
    fn key(&self) -> &str;
}

/// A subscriber to a [`Broadcaster`](super::Broadcaster).
///
/// `update` returning an error never stops delivery to other observers.
pub trait Observer<E> {
    /// Unique id within one broadcaster
    fn id(&self) -> &str;

    fn update(&mut self, event: &E) -> anyhow::Result<()>;

    /// Inactive observers are skipped during fan-out
    fn is_active(&self) -> bool {
        true
    }

    fn set_active(&mut self, _active: bool) {}
}

/// Set of event keys an observer cares about.
///
/// An empty set means "watch everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFilter {
    keys: BTreeSet<String>,
}

impl KeyFilter {
    /// Filter that accepts every key
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter restricted to `keys`
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn watch(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    /// Stop watching `key`. Removing the last key widens the filter to everything.
    pub fn unwatch(&mut self, key: &str) -> bool {
        self.keys.remove(key)
    }

    pub fn watch_all(&mut self) {
        self.keys.clear();
    }

    pub fn is_watching_all(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_interested(&self, key: &str) -> bool {
        self.keys.is_empty() || self.keys.contains(key)
    }

    pub fn watched_keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

type Callback<E> = Box<dyn FnMut(&E) -> anyhow::Result<()>>;

/// Observer that forwards each event to a closure
pub struct CallbackObserver<E> {
    id: String,
    active: bool,
    callback: Callback<E>,
}

impl<E> CallbackObserver<E> {
    pub fn new<F>(id: impl Into<String>, callback: F) -> Self
    where
        F: FnMut(&E) -> anyhow::Result<()> + 'static,
    {
        Self {
            id: id.into(),
            active: true,
            callback: Box::new(callback),
        }
    }
}

impl<E> fmt::Debug for CallbackObserver<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackObserver")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl<E> Observer<E> for CallbackObserver<E> {
    fn id(&self) -> &str {
        &self.id
    }

    fn update(&mut self, event: &E) -> anyhow::Result<()> {
        (self.callback)(event)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
