//! Scope-end notifications.
//!
//! The manager never expires scopes on its own. Whatever owns the scope
//! lifetime (a session store, a connection handler) tells the manager when a
//! scope ends, either by calling
//! [`IdentifierManager::remove_identifiers`](crate::IdentifierManager::remove_identifiers)
//! directly or through the [`ScopeEndListener`] trait.
//!
//! [`SessionEndNotifier`] is a small dispatcher for applications that run more
//! than one manager (or other per-session caches) and want a single call site
//! for "this session is gone".

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{hash::HashProvider, logging::ScopeLabel, manager::IdentifierManager};

/// Receives a notification when a scope ends.
pub trait ScopeEndListener: Send + Sync {
    /// Called once the scope is over; implementations drop any state held for it.
    fn scope_ended(&self, scope: &str);
}

impl<H: HashProvider> ScopeEndListener for IdentifierManager<H> {
    fn scope_ended(&self, scope: &str) {
        self.remove_identifiers(scope);
    }
}

impl<L: ScopeEndListener + ?Sized> ScopeEndListener for Arc<L> {
    fn scope_ended(&self, scope: &str) {
        (**self).scope_ended(scope)
    }
}

/// Fans a scope-end notification out to every registered listener.
///
/// Listeners are identified by their `Arc` allocation; registering the same
/// listener twice has no effect.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use scoped_identifiers::{IdentifierManager, SessionEndNotifier};
///
/// let manager = Arc::new(IdentifierManager::new());
/// let notifier = SessionEndNotifier::new();
/// notifier.add_listener(manager.clone());
///
/// let digest = manager.get_temporary_identifier("session-1", 7_u32).unwrap();
/// notifier.notify_scope_ended("session-1");
///
/// assert_eq!(manager.try_get_identifier::<u32>("session-1", &digest), None);
/// ```
#[derive(Default)]
pub struct SessionEndNotifier {
    listeners: Mutex<Vec<Arc<dyn ScopeEndListener>>>,
}

impl SessionEndNotifier {
    /// Creates a notifier with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`. Returns `false` if it was already registered.
    pub fn add_listener(&self, listener: Arc<dyn ScopeEndListener>) -> bool {
        let mut listeners = self.listeners.lock();
        if listeners.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Unregisters `listener`. Returns `false` if it was not registered.
    pub fn remove_listener(&self, listener: &Arc<dyn ScopeEndListener>) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    /// Unregisters every listener.
    pub fn clear_listeners(&self) {
        self.listeners.lock().clear();
    }

    /// Returns the number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    /// Tells every registered listener that `scope` has ended.
    ///
    /// The listener list is snapshotted first, so listeners may register or
    /// unregister from inside the callback.
    pub fn notify_scope_ended(&self, scope: &str) {
        let snapshot: Vec<Arc<dyn ScopeEndListener>> = self.listeners.lock().clone();
        tracing::debug!(
            scope = %ScopeLabel::new(scope),
            listeners = snapshot.len(),
            "scope ended"
        );
        for listener in snapshot {
            listener.scope_ended(scope);
        }
    }
}

impl std::fmt::Debug for SessionEndNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEndNotifier")
            .field("listeners", &self.len())
            .finish()
    }
}

// Compares allocations only; vtable pointers may differ across codegen units.
fn same_listener(a: &Arc<dyn ScopeEndListener>, b: &Arc<dyn ScopeEndListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingListener {
        ended: Mutex<Vec<String>>,
    }

    impl ScopeEndListener for RecordingListener {
        fn scope_ended(&self, scope: &str) {
            self.ended.lock().push(scope.to_string());
        }
    }

    #[test]
    fn manager_listener_evicts_scope() {
        let manager = IdentifierManager::new();
        let digest = manager.get_temporary_identifier("S1", 1).unwrap();

        manager.scope_ended("S1");

        assert!(!manager.contains_scope("S1"));
        assert_eq!(manager.try_get_identifier::<i32>("S1", &digest), None);
    }

    #[test]
    fn notifier_reaches_every_listener() {
        let first = Arc::new(RecordingListener::default());
        let second = Arc::new(RecordingListener::default());
        let notifier = SessionEndNotifier::new();
        notifier.add_listener(first.clone());
        notifier.add_listener(second.clone());

        notifier.notify_scope_ended("S1");

        assert_eq!(*first.ended.lock(), vec!["S1".to_string()]);
        assert_eq!(*second.ended.lock(), vec!["S1".to_string()]);
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let listener: Arc<dyn ScopeEndListener> = Arc::new(RecordingListener::default());
        let notifier = SessionEndNotifier::new();

        assert!(notifier.add_listener(listener.clone()));
        assert!(!notifier.add_listener(listener.clone()));
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn removed_listener_is_not_notified() {
        let recording = Arc::new(RecordingListener::default());
        let listener: Arc<dyn ScopeEndListener> = recording.clone();
        let notifier = SessionEndNotifier::new();
        notifier.add_listener(listener.clone());

        assert!(notifier.remove_listener(&listener));
        assert!(!notifier.remove_listener(&listener));
        notifier.notify_scope_ended("S1");

        assert!(recording.ended.lock().is_empty());
    }

    #[test]
    fn clear_listeners_empties_the_list() {
        let notifier = SessionEndNotifier::new();
        notifier.add_listener(Arc::new(RecordingListener::default()));
        notifier.add_listener(Arc::new(RecordingListener::default()));

        notifier.clear_listeners();

        assert!(notifier.is_empty());
        notifier.notify_scope_ended("S1");
    }

    #[test]
    fn listener_may_unregister_during_notification() {
        struct SelfRemoving {
            notifier: Arc<SessionEndNotifier>,
            me: Mutex<Option<Arc<dyn ScopeEndListener>>>,
        }

        impl ScopeEndListener for SelfRemoving {
            fn scope_ended(&self, _scope: &str) {
                if let Some(me) = self.me.lock().take() {
                    self.notifier.remove_listener(&me);
                }
            }
        }

        let notifier = Arc::new(SessionEndNotifier::new());
        let listener = Arc::new(SelfRemoving {
            notifier: notifier.clone(),
            me: Mutex::new(None),
        });
        let as_dyn: Arc<dyn ScopeEndListener> = listener.clone();
        *listener.me.lock() = Some(as_dyn.clone());
        notifier.add_listener(as_dyn);

        notifier.notify_scope_ended("S1");

        assert!(notifier.is_empty());
    }
}
