//! Observer registry with keyed fan-out and delivery statistics.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::observer::{ChangeEvent, KeyFilter, Observer};

/// Default maximum number of observers per broadcaster
pub const DEFAULT_MAX_OBSERVERS: usize = 50;

/// Errors returned when registering an observer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// The broadcaster already holds `max` observers
    CapacityExceeded { max: usize },
}

impl std::fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExceeded { max } => {
                write!(f, "observer limit reached ({} max)", max)
            }
        }
    }
}

impl std::error::Error for BroadcastError {}

/// Snapshot of the broadcaster's running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastStats {
    /// Calls to `notify`
    pub total_notifications: u64,
    /// Observer updates that returned an error
    pub notification_errors: u64,
    /// Observer updates that succeeded
    pub deliveries: u64,
    /// Currently attached observers reporting active
    pub active_observers: usize,
    pub last_notification: Option<Duration>,
    pub average_notification: Option<Duration>,
}

struct Subscription<E> {
    observer: Box<dyn Observer<E>>,
    filter: KeyFilter,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    total_notifications: u64,
    notification_errors: u64,
    deliveries: u64,
    total_time: Duration,
    last_time: Option<Duration>,
}

/// Publishes events to registered observers.
///
/// Observers are notified synchronously in registration order. One failing
/// observer is counted and logged; the rest still receive the event.
pub struct Broadcaster<E> {
    subscriptions: Vec<Subscription<E>>,
    max_observers: usize,
    counters: Counters,
}

impl<E: ChangeEvent> Default for Broadcaster<E> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OBSERVERS)
    }
}

impl<E: ChangeEvent> Broadcaster<E> {
    pub fn new(max_observers: usize) -> Self {
        Self {
            subscriptions: Vec::new(),
            max_observers,
            counters: Counters::default(),
        }
    }

    pub fn max_observers(&self) -> usize {
        self.max_observers
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Observer ids in registration order
    pub fn observer_ids(&self) -> Vec<&str> {
        self.subscriptions
            .iter()
            .map(|s| s.observer.id())
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.subscriptions
            .iter()
            .position(|s| s.observer.id() == id)
    }

    fn filter_mut(&mut self, id: &str) -> Option<&mut KeyFilter> {
        self.subscriptions
            .iter_mut()
            .find(|s| s.observer.id() == id)
            .map(|s| &mut s.filter)
    }

    /// Register an observer that receives every event.
    ///
    /// Returns `Ok(false)` if an observer with the same id is already attached.
    pub fn attach(&mut self, observer: Box<dyn Observer<E>>) -> Result<bool, BroadcastError> {
        self.attach_filtered(observer, KeyFilter::all())
    }

    /// Register an observer that only receives events matching `filter`
    pub fn attach_filtered(
        &mut self,
        observer: Box<dyn Observer<E>>,
        filter: KeyFilter,
    ) -> Result<bool, BroadcastError> {
        if self.contains(observer.id()) {
            tracing::debug!(observer = observer.id(), "observer already attached");
            return Ok(false);
        }
        if self.subscriptions.len() >= self.max_observers {
            tracing::warn!(
                observer = observer.id(),
                max = self.max_observers,
                "observer limit reached"
            );
            return Err(BroadcastError::CapacityExceeded {
                max: self.max_observers,
            });
        }

        tracing::debug!(observer = observer.id(), "observer attached");
        self.subscriptions.push(Subscription { observer, filter });
        Ok(true)
    }

    pub fn detach(&mut self, observer: &dyn Observer<E>) -> bool {
        self.detach_by_id(observer.id())
    }

    /// Remove the observer with `id`. Returns whether anything was removed.
    pub fn detach_by_id(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.subscriptions.remove(idx);
                tracing::debug!(observer = id, "observer detached");
                true
            }
            None => false,
        }
    }

    /// Restrict observer `id` to `key` (in addition to keys it already watches)
    pub fn watch_key(&mut self, id: &str, key: impl Into<String>) -> bool {
        match self.filter_mut(id) {
            Some(filter) => {
                filter.watch(key);
                true
            }
            None => false,
        }
    }

    pub fn unwatch_key(&mut self, id: &str, key: &str) -> bool {
        self.filter_mut(id).is_some_and(|filter| filter.unwatch(key))
    }

    /// Switch observer `id` back to receiving every event
    pub fn watch_all(&mut self, id: &str) -> bool {
        match self.filter_mut(id) {
            Some(filter) => {
                filter.watch_all();
                true
            }
            None => false,
        }
    }

    /// Whether observer `id` would receive an event with `key`
    pub fn is_interested(&self, id: &str, key: &str) -> bool {
        self.position(id)
            .is_some_and(|idx| self.subscriptions[idx].filter.is_interested(key))
    }

    pub fn filter(&self, id: &str) -> Option<&KeyFilter> {
        self.position(id).map(|idx| &self.subscriptions[idx].filter)
    }

    /// Activate or deactivate observer `id` without detaching it
    pub fn set_active(&mut self, id: &str, active: bool) -> bool {
        match self.subscriptions.iter_mut().find(|s| s.observer.id() == id) {
            Some(sub) => {
                sub.observer.set_active(active);
                true
            }
            None => false,
        }
    }

    /// Deliver `event` to every active observer interested in its key.
    ///
    /// Returns the number of successful deliveries. Observer errors are
    /// counted in [`BroadcastStats::notification_errors`] and never returned.
    pub fn notify(&mut self, event: &E) -> usize {
        let started = Instant::now();
        let key = event.key();
        let mut delivered = 0;

        for sub in &mut self.subscriptions {
            if !sub.observer.is_active() || !sub.filter.is_interested(key) {
                continue;
            }
            match sub.observer.update(event) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    self.counters.notification_errors += 1;
                    tracing::warn!(
                        observer = sub.observer.id(),
                        key,
                        error = %e,
                        "observer update failed"
                    );
                }
            }
        }

        let elapsed = started.elapsed();
        self.counters.total_notifications += 1;
        self.counters.deliveries += delivered as u64;
        self.counters.total_time += elapsed;
        self.counters.last_time = Some(elapsed);

        tracing::trace!(key, delivered, ?elapsed, "notified");
        delivered
    }

    pub fn stats(&self) -> BroadcastStats {
        let c = &self.counters;
        let average_notification = (c.total_notifications > 0).then(|| {
            let nanos = c.total_time.as_nanos() / u128::from(c.total_notifications);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        });

        BroadcastStats {
            total_notifications: c.total_notifications,
            notification_errors: c.notification_errors,
            deliveries: c.deliveries,
            active_observers: self
                .subscriptions
                .iter()
                .filter(|s| s.observer.is_active())
                .count(),
            last_notification: c.last_time,
            average_notification,
        }
    }

    pub fn reset_stats(&mut self) {
        self.counters = Counters::default();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::notify::observer::CallbackObserver;

    struct Ping(&'static str);

    impl ChangeEvent for Ping {
        fn key(&self) -> &str {
            self.0
        }
    }

    fn counting(id: &str, hits: &Rc<RefCell<Vec<String>>>) -> Box<dyn Observer<Ping>> {
        let hits = Rc::clone(hits);
        let name = id.to_string();
        Box::new(CallbackObserver::new(id, move |p: &Ping| {
            hits.borrow_mut().push(format!("{}:{}", name, p.0));
            Ok(())
        }))
    }

    #[test]
    fn test_attach_is_idempotent() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut b = Broadcaster::default();
        assert_eq!(b.attach(counting("a", &hits)), Ok(true));
        assert_eq!(b.attach(counting("a", &hits)), Ok(false));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_attach_over_capacity_fails() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut b = Broadcaster::new(1);
        b.attach(counting("a", &hits)).unwrap();
        assert_eq!(
            b.attach(counting("b", &hits)),
            Err(BroadcastError::CapacityExceeded { max: 1 })
        );
    }

    #[test]
    fn test_registration_order_is_fan_out_order() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut b = Broadcaster::default();
        b.attach(counting("z", &hits)).unwrap();
        b.attach(counting("a", &hits)).unwrap();

        assert_eq!(b.notify(&Ping("k")), 2);
        assert_eq!(*hits.borrow(), vec!["z:k", "a:k"]);
        assert_eq!(b.observer_ids(), vec!["z", "a"]);
    }

    #[test]
    fn test_key_filtering() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut b = Broadcaster::default();
        b.attach_filtered(counting("theme", &hits), KeyFilter::keys(["theme"]))
            .unwrap();
        b.attach(counting("all", &hits)).unwrap();

        b.notify(&Ping("font"));
        b.notify(&Ping("theme"));
        assert_eq!(*hits.borrow(), vec!["all:font", "theme:theme", "all:theme"]);

        assert!(b.is_interested("theme", "theme"));
        assert!(!b.is_interested("theme", "font"));
        assert!(b.watch_all("theme"));
        assert!(b.is_interested("theme", "font"));
    }

    #[test]
    fn test_watch_and_unwatch_key() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut b = Broadcaster::default();
        b.attach(counting("a", &hits)).unwrap();

        assert!(b.watch_key("a", "x"));
        assert!(!b.is_interested("a", "y"));
        assert!(b.unwatch_key("a", "x"));
        assert!(b.is_interested("a", "y"));
        assert!(!b.watch_key("missing", "x"));
        assert!(!b.is_interested("missing", "x"));
    }

    #[test]
    fn test_inactive_observer_skipped() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut b = Broadcaster::default();
        b.attach(counting("a", &hits)).unwrap();
        assert!(b.set_active("a", false));

        assert_eq!(b.notify(&Ping("k")), 0);
        assert!(hits.borrow().is_empty());
        assert_eq!(b.stats().active_observers, 0);
    }

    #[test]
    fn test_failing_observer_is_isolated() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut b = Broadcaster::default();
        b.attach(Box::new(CallbackObserver::new("bad", |_: &Ping| {
            anyhow::bail!("observer exploded")
        })))
        .unwrap();
        b.attach(counting("good", &hits)).unwrap();

        assert_eq!(b.notify(&Ping("k")), 1);
        assert_eq!(*hits.borrow(), vec!["good:k"]);

        let stats = b.stats();
        assert_eq!(stats.notification_errors, 1);
        assert_eq!(stats.total_notifications, 1);
        assert_eq!(stats.deliveries, 1);
    }

    #[test]
    fn test_detach() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut b = Broadcaster::default();
        let observer = CallbackObserver::new("a", |_: &Ping| Ok(()));
        b.attach(counting("a", &hits)).unwrap();

        assert!(b.detach(&observer));
        assert!(!b.detach_by_id("a"));
        assert!(b.is_empty());
    }

    #[test]
    fn test_stats_timing_and_reset() {
        let mut b: Broadcaster<Ping> = Broadcaster::default();
        assert_eq!(b.stats().average_notification, None);

        b.notify(&Ping("k"));
        b.notify(&Ping("k"));
        let stats = b.stats();
        assert_eq!(stats.total_notifications, 2);
        assert!(stats.last_notification.is_some());
        assert!(stats.average_notification.is_some());

        b.reset_stats();
        assert_eq!(b.stats(), BroadcastStats::default());
    }
}
