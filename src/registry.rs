// Ordered listener registry with failure-isolated fan-out

use crate::listener::{BookingListener, NotifyError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

// One listener that failed during a notification round
#[derive(Debug)]
pub struct ListenerFailure {
    pub position: usize,
    pub listener: String,
    pub error: NotifyError,
}

// Result of a notification round
#[derive(Debug, Default)]
pub struct NotifyReport {
    pub delivered: usize,
    pub failures: Vec<ListenerFailure>,
}

impl NotifyReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn BookingListener>>>,
}

// Listeners are compared by allocation, not by value
fn same_listener<L: BookingListener + ?Sized>(a: &Arc<dyn BookingListener>, b: &Arc<L>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Appends without a uniqueness check: registering twice means two deliveries per event
    pub fn register(&self, listener: Arc<dyn BookingListener>) {
        debug!(listener = listener.name(), "registering listener");
        self.listeners.write().push(listener);
    }

    // Removes every registration of this listener, returns how many were removed
    pub fn unregister<L: BookingListener + ?Sized>(&self, listener: &Arc<L>) -> usize {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|registered| !same_listener(registered, listener));
        let removed = before - listeners.len();
        debug!(listener = listener.name(), removed, "unregistered listener");
        removed
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    // Delivers `message` to every listener registered when the call starts.
    //
    // The list is snapshotted under the read lock and the lock is released
    // before any listener runs, so a listener may register or unregister
    // (itself included) without deadlocking; such changes apply to the next
    // round only.
    pub fn notify_all(&self, message: &str) -> NotifyReport {
        let snapshot: Vec<Arc<dyn BookingListener>> = self.listeners.read().clone();
        let mut report = NotifyReport::default();

        for (position, listener) in snapshot.iter().enumerate() {
            match listener.on_notify(message) {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    warn!(
                        listener = listener.name(),
                        position,
                        error = %error,
                        "listener failed to handle notification"
                    );
                    report.failures.push(ListenerFailure {
                        position,
                        listener: listener.name().to_string(),
                        error,
                    });
                }
            }
        }

        report
    }
}
