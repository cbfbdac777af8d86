use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::types::{Signal, SignalKind};

/// Default buffer size of the async signal stream.
pub const DEFAULT_STREAM_CAPACITY: usize = 64;

type Listener = Arc<dyn Fn(&Signal) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<SignalKind, Vec<(u64, Listener)>>,
}

struct BusInner {
    registry: Mutex<Registry>,
    /// Mirror of every published signal for async observers.
    tx: broadcast::Sender<Signal>,
}

impl BusInner {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        match self.registry.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!(
                    event = "core.bus.registry_lock_poisoned",
                    "A listener panicked while registering, recovering registry"
                );
                e.into_inner()
            }
        }
    }

    fn remove(&self, kind: SignalKind, id: u64) -> bool {
        let mut registry = self.registry();
        let Some(listeners) = registry.listeners.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }
}

/// In-process publish/subscribe bus for named signals.
///
/// Owned by the application root and handed to each panel; clones share
/// the same registry. Delivery is synchronous and fire-and-forget: the
/// publisher neither knows nor cares whether anybody listens, and the
/// order across listeners is unspecified.
#[derive(Clone)]
pub struct SignalBus {
    inner: Arc<BusInner>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::with_stream_capacity(DEFAULT_STREAM_CAPACITY)
    }

    pub fn with_stream_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(BusInner {
                registry: Mutex::new(Registry::default()),
                tx,
            }),
        }
    }

    /// Register `listener` for every signal of `kind`.
    ///
    /// The listener stays registered until the returned guard is dropped
    /// or [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, kind: SignalKind, listener: F) -> Subscription
    where
        F: Fn(&Signal) + Send + Sync + 'static,
    {
        let id = {
            let mut registry = self.inner.registry();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .listeners
                .entry(kind)
                .or_default()
                .push((id, Arc::new(listener)));
            id
        };

        debug!(
            event = "core.bus.subscribed",
            signal = kind.name(),
            subscription_id = id
        );

        Subscription {
            bus: Some(Arc::downgrade(&self.inner)),
            kind,
            id,
        }
    }

    /// Publish `signal` to every current listener of its kind.
    ///
    /// Listeners run outside the registry lock, so they may publish or
    /// subscribe themselves. Returns the number of synchronous listeners
    /// that received the signal.
    pub fn publish(&self, signal: Signal) -> usize {
        let kind = signal.kind();
        let listeners: Vec<Listener> = self
            .inner
            .registry()
            .listeners
            .get(&kind)
            .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        for listener in &listeners {
            listener(&signal);
        }

        debug!(
            event = "core.bus.published",
            signal = kind.name(),
            listener_count = listeners.len()
        );

        // No stream receivers is normal; the signal is simply gone.
        if self.inner.tx.send(signal).is_err() {
            debug!(event = "core.bus.stream_no_receivers", signal = kind.name());
        }

        listeners.len()
    }

    /// Receive a copy of every signal published from now on.
    pub fn stream(&self) -> broadcast::Receiver<Signal> {
        self.inner.tx.subscribe()
    }

    /// Number of synchronous listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.inner
            .registry()
            .listeners
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBus")
            .field("stream_receivers", &self.inner.tx.receiver_count())
            .finish_non_exhaustive()
    }
}

/// Guard for a registered listener.
///
/// Releases the registration exactly once, either through
/// [`unsubscribe`](Self::unsubscribe) or on drop. Outliving the bus is
/// harmless.
#[derive(Debug)]
pub struct Subscription {
    bus: Option<Weak<BusInner>>,
    kind: SignalKind,
    id: u64,
}

impl Subscription {
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.bus.as_ref().is_some_and(|bus| bus.strong_count() > 0)
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(bus) = self.bus.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        let removed = bus.remove(self.kind, self.id);
        debug!(
            event = "core.bus.unsubscribed",
            signal = self.kind.name(),
            subscription_id = self.id,
            removed = removed
        );
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterModel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&Signal) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, move |_: &Signal| {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_publish_without_listeners_is_ok() {
        let bus = SignalBus::new();
        assert_eq!(bus.publish(Signal::ClearFilters), 0);
    }

    #[test]
    fn test_publish_reaches_only_matching_kind() {
        let bus = SignalBus::new();
        let (clears, on_clear) = counter();
        let (applies, on_apply) = counter();
        let _s1 = bus.subscribe(SignalKind::ClearFilters, on_clear);
        let _s2 = bus.subscribe(SignalKind::ApplyFilters, on_apply);

        bus.publish(Signal::ClearFilters);
        bus.publish(Signal::ClearFilters);

        assert_eq!(clears.load(Ordering::SeqCst), 2);
        assert_eq!(applies.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_multiple_independent_listeners() {
        let bus = SignalBus::new();
        let (a, on_a) = counter();
        let (b, on_b) = counter();
        let _s1 = bus.subscribe(SignalKind::MainAppClearFilters, on_a);
        let _s2 = bus.subscribe(SignalKind::MainAppClearFilters, on_b);

        assert_eq!(bus.publish(Signal::MainAppClearFilters), 2);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = SignalBus::new();
        let (count, listener) = counter();
        let sub = bus.subscribe(SignalKind::ClearFilters, listener);
        assert_eq!(bus.listener_count(SignalKind::ClearFilters), 1);

        drop(sub);
        assert_eq!(bus.listener_count(SignalKind::ClearFilters), 0);

        bus.publish(Signal::ClearFilters);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_only_removes_own_listener() {
        let bus = SignalBus::new();
        let (_, first) = counter();
        let (second_count, second) = counter();
        let s1 = bus.subscribe(SignalKind::ClearFilters, first);
        let _s2 = bus.subscribe(SignalKind::ClearFilters, second);

        s1.unsubscribe();
        assert_eq!(bus.listener_count(SignalKind::ClearFilters), 1);

        bus.publish(Signal::ClearFilters);
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let bus = SignalBus::new();
        let (_, listener) = counter();
        let sub = bus.subscribe(SignalKind::ClearFilters, listener);
        assert!(sub.is_active());

        drop(bus);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn test_listener_may_publish_reentrantly() {
        let bus = SignalBus::new();
        let (clears, on_clear) = counter();
        let _clear_sub = bus.subscribe(SignalKind::ClearFilters, on_clear);

        let relay = bus.clone();
        let _relay_sub = bus.subscribe(SignalKind::MainAppClearFilters, move |_| {
            relay.publish(Signal::ClearFilters);
        });

        bus.publish(Signal::MainAppClearFilters);
        assert_eq!(clears.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stream_mirrors_published_signals() {
        let bus = SignalBus::new();
        let mut rx = bus.stream();

        let payload = FilterModel::default();
        bus.publish(Signal::ApplyFilters(payload.clone()));
        bus.publish(Signal::ClearFilters);

        assert_eq!(rx.try_recv().unwrap(), Signal::ApplyFilters(payload));
        assert_eq!(rx.try_recv().unwrap(), Signal::ClearFilters);
        assert!(rx.try_recv().is_err());
    }
}
