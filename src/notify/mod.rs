//! Generic publish/subscribe for change notifications.
//!
//! A [`Broadcaster`] owns a set of [`Observer`]s and fans each event out to
//! the ones whose [`KeyFilter`] matches the event's key. It knows nothing
//! about commands or history; sessions use it to announce config changes.

mod broadcaster;
mod composite;
mod event;
mod observer;

pub use broadcaster::{BroadcastError, BroadcastStats, Broadcaster, DEFAULT_MAX_OBSERVERS};
pub use composite::CompositeObserver;
pub use event::ConfigChange;
pub use observer::{CallbackObserver, ChangeEvent, KeyFilter, Observer};
