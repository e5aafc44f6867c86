//! Camera event subscriptions and the debounced stop signal.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec3;
use web_time::{Duration, Instant};

/// Quiet period after the last change before `camera_stop` fires.
pub const STOP_DEBOUNCE: Duration = Duration::from_millis(100);

/// Listener for `camera_change(position, target)`.
pub type CameraChangeListener = dyn FnMut(DVec3, DVec3);
/// Listener for `camera_stop()`.
pub type CameraStopListener = dyn FnMut();

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ordered set of boxed listeners of one kind.
pub struct EventTrigger<F: ?Sized> {
    listeners: Vec<(SubscriptionId, Box<F>)>,
}

impl<F: ?Sized> Default for EventTrigger<F> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<F: ?Sized> std::fmt::Debug for EventTrigger<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTrigger")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<F: ?Sized> EventTrigger<F> {
    /// Add a listener. Listeners run in subscription order.
    pub fn subscribe(&mut self, listener: Box<F>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns whether it was subscribed here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Invoke every listener through `call`.
    pub fn fire_with(&mut self, mut call: impl FnMut(&mut F)) {
        for (_, listener) in &mut self.listeners {
            call(listener);
        }
    }

    /// Drop all listeners.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl EventTrigger<CameraChangeListener> {
    /// Notify change listeners.
    pub fn fire(&mut self, position: DVec3, target: DVec3) {
        self.fire_with(|listener| listener(position, target));
    }
}

impl EventTrigger<CameraStopListener> {
    /// Notify stop listeners.
    pub fn fire(&mut self) {
        self.fire_with(|listener| listener());
    }
}

/// Deadline-based debouncer. Every [`notify`](Self::notify) pushes the
/// deadline back; [`poll`](Self::poll) reports `true` exactly once after
/// the deadline passes.
#[derive(Debug, Clone)]
pub struct DebouncedStopTrigger {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for DebouncedStopTrigger {
    fn default() -> Self {
        Self::new(STOP_DEBOUNCE)
    }
}

impl DebouncedStopTrigger {
    /// Debouncer with a custom quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record a change at `now`.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Whether the stop event is due. Disarms once it fires.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a stop event is still pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Forget any pending stop.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
