use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use log::trace;

use crate::store::Registry;

/// Removes the observer registered by the matching
/// [`Store::subscribe`](crate::Store::subscribe) call.
///
/// Each subscription owns exactly one registry entry: if the same callback
/// was subscribed several times, every `Subscription` removes only the entry
/// it was created for. [`unsubscribe`](Subscription::unsubscribe) is
/// idempotent: the handle tracks its own already-removed flag, and a second
/// call is a silent no-op even if the callback was re-subscribed in the
/// meantime.
///
/// Dropping a `Subscription` does **not** unsubscribe the observer; removal
/// only ever happens through an explicit `unsubscribe` call.
///
/// # Examples
/// ```
/// use statefold::Store;
/// use std::sync::{Arc, Mutex};
///
/// let store = Store::new(0);
/// let seen: Arc<Mutex<Vec<i32>>> = Default::default();
///
/// let subscription = store.subscribe({
///     let store = store.clone();
///     let seen = seen.clone();
///     move || seen.lock().unwrap().push(store.get())
/// });
///
/// store.mutate(|n: &i32| n + 1).unwrap();
/// subscription.unsubscribe();
/// subscription.unsubscribe(); // no-op
/// store.mutate(|n: &i32| n + 1).unwrap();
///
/// assert_eq!(vec![1], seen.lock().unwrap().clone());
/// ```
#[must_use = "dropping a Subscription does not unsubscribe the observer"]
pub struct Subscription {
    id: u64,
    registry: Arc<Mutex<Registry>>,
    removed: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: Arc<Mutex<Registry>>) -> Self {
        Self {
            id,
            registry,
            removed: AtomicBool::new(false),
        }
    }

    /// Removes this subscription's entry from the store's registry.
    ///
    /// The first call removes the entry; every later call is a silent no-op.
    /// A notification pass that already snapshotted this observer still
    /// delivers to it; the removal takes effect for all future passes.
    pub fn unsubscribe(&self) {
        if self.removed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.registry
            .lock()
            .expect("unable to acquire lock on observers")
            .remove(self.id);
        trace!("observer {} unsubscribed", self.id);
    }
}
