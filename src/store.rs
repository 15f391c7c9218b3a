use std::{
    fmt::Debug,
    ops::{Deref, DerefMut},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use log::trace;

use crate::{Reduce, StoreError, Subscription};

pub(crate) type Observer = Arc<dyn Fn() + Send + Sync>;

/// Ordered observer entries, tagged with the id their [`Subscription`] removes
/// them by. Duplicate callbacks get distinct ids.
pub(crate) struct Registry {
    next_id: u64,
    entries: Vec<(u64, Observer)>,
}

impl Registry {
    const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn add(&mut self, observer: Observer) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) {
        if let Some(pos) = self.entries.iter().position(|(entry, _)| *entry == id) {
            self.entries.remove(pos);
        }
    }

    fn snapshot(&self) -> Vec<Observer> {
        self.entries
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

/// Single-owner synchronous state container using the observer pattern.
///
/// A `Store<S>` holds exactly one current state value. The only way to change
/// it is [`mutate`](Store::mutate), which folds a reducer pipeline over the
/// current state, commits the result once, and then notifies every subscribed
/// observer exactly once, in subscription order.
///
/// Cloning a `Store` produces another handle to the same store, not a new
/// store; separately constructed stores never share state or observers.
///
/// # Examples
/// ```
/// use statefold::Store;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: u32,
/// }
///
/// let store = Store::new(Counter { count: 0 });
/// let committed = store
///     .mutate(|s: &Counter| Counter { count: s.count + 1 })
///     .unwrap();
///
/// assert_eq!(Counter { count: 1 }, committed);
/// assert_eq!(Counter { count: 1 }, store.get());
/// ```
pub struct Store<S> {
    state: Arc<Mutex<S>>,
    registry: Arc<Mutex<Registry>>,
    mutating: Arc<AtomicBool>,
}

impl<S> Store<S> {
    /// Constructs a new store that owns `initial` as its current state.
    ///
    /// # Examples
    /// ```
    /// use statefold::Store;
    ///
    /// let store = Store::new(10);
    /// assert_eq!(10, store.get());
    /// ```
    pub fn new(initial: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
            registry: Arc::new(Mutex::new(Registry::new())),
            mutating: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs `f` against a borrow of the current state and returns its result,
    /// without cloning the state.
    ///
    /// # Examples
    /// ```
    /// use statefold::Store;
    ///
    /// let store = Store::new(String::from("🦀"));
    /// let len = store.read(|s| s.len());
    ///
    /// assert_eq!(4, len);
    /// ```
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(self.acq_state_lock().deref())
    }

    /// Appends `observer` to the registry and returns the [`Subscription`]
    /// that removes this exact entry.
    ///
    /// Observers are zero-argument callbacks: they receive no payload and
    /// pull whatever state they need through a store handle they capture.
    /// They run once per committed mutation, in subscription order. The same
    /// callback may be subscribed any number of times; each subscription is
    /// an independent entry, removable only through its own handle.
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
    /// store.mutate(|n: &i32| n * 10).unwrap();
    ///
    /// assert_eq!(vec![1, 10], seen.lock().unwrap().clone());
    ///
    /// subscription.unsubscribe();
    /// ```
    pub fn subscribe(&self, observer: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.acq_registry_lock().add(Arc::new(observer));
        trace!("observer {id} subscribed");
        Subscription::new(id, Arc::clone(&self.registry))
    }

    fn acq_state_lock(&self) -> MutexGuard<'_, S> {
        self.state.lock().expect("unable to acquire lock on state")
    }

    fn acq_registry_lock(&self) -> MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .expect("unable to acquire lock on observers")
    }
}

impl<S: Clone> Store<S> {
    /// Returns a clone/copy of the current state.
    ///
    /// # Examples
    /// ```
    /// use statefold::Store;
    ///
    /// let store = Store::new(String::from("🦀"));
    /// assert_eq!("🦀", store.get());
    /// ```
    pub fn get(&self) -> S {
        self.acq_state_lock().deref().clone()
    }

    /// Folds `reducers` left-to-right over the current state, commits the
    /// final result as the new state, then notifies every observer once, in
    /// subscription order, and returns the committed state.
    ///
    /// `reducers` is anything that implements [`Reduce`]: a single closure, a
    /// tuple of up to twelve closures, `()`, or a boxed list (see
    /// [`BoxedReducer`](crate::BoxedReducer)). Intermediate values of the
    /// fold are never observable: there is exactly one commit and exactly one
    /// notification pass per call. The empty pipeline commits the current
    /// state to itself and still notifies.
    ///
    /// The notification pass runs over a snapshot of the registry taken at
    /// commit time, so observers that subscribe or unsubscribe during the
    /// pass only affect future passes. No store locks are held while
    /// observers run; they may freely call [`get`](Store::get),
    /// [`read`](Store::read), [`subscribe`](Store::subscribe), and
    /// [`Subscription::unsubscribe`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReentrantMutation`] when a mutation is already
    /// running on this store, whether issued from inside a reducer or
    /// observer, or through another handle. The failed call leaves state and
    /// observers untouched and calls no observer. Reducers receive the
    /// current state by reference and must not call back into the store's
    /// read operations.
    ///
    /// # Examples
    /// ```
    /// use statefold::Store;
    ///
    /// let store = Store::new(10);
    /// let committed = store.mutate(|n: &i32| n + 5).unwrap();
    ///
    /// assert_eq!(15, committed);
    /// assert_eq!(15, store.get());
    /// ```
    ///
    /// Multiple reducers fold in argument order before the single commit:
    /// ```
    /// use statefold::Store;
    ///
    /// let store = Store::new(2);
    /// let committed = store
    ///     .mutate((
    ///         |n: &i32| n + 1,
    ///         |n: &i32| n * 10,
    ///     ))
    ///     .unwrap();
    ///
    /// assert_eq!(30, committed);
    /// ```
    pub fn mutate<C>(&self, reducers: C) -> Result<S, StoreError>
    where
        C: Reduce<S>,
    {
        let _guard = MutationGuard::acquire(&self.mutating)?;

        let committed = {
            let mut state = self.acq_state_lock();
            let next = reducers.fold(state.deref());
            *state.deref_mut() = next;
            state.deref().clone()
        };
        trace!("state committed");

        let snapshot = self.acq_registry_lock().snapshot();
        trace!("notifying {} observers", snapshot.len());
        for observer in snapshot {
            observer();
        }

        Ok(committed)
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            registry: Arc::clone(&self.registry),
            mutating: Arc::clone(&self.mutating),
        }
    }
}

impl<S: Debug> Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Store")
            .field(self.acq_state_lock().deref())
            .finish()
    }
}

/// Held for the whole of a mutate call; clears the in-progress flag on drop,
/// unwind included.
struct MutationGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> MutationGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, StoreError> {
        if flag.swap(true, Ordering::Acquire) {
            return Err(StoreError::ReentrantMutation);
        }
        Ok(Self { flag })
    }
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
