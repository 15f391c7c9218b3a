/// A reducer whose concrete type is erased, for pipelines assembled at
/// runtime.
///
/// ```
/// use statefold::{BoxedReducer, Store};
///
/// let store = Store::new(vec![1, 2]);
/// let mut pipeline: Vec<BoxedReducer<Vec<i32>>> = Vec::new();
/// pipeline.push(Box::new(|v: &Vec<i32>| {
///     let mut next = v.clone();
///     next.push(3);
///     next
/// }));
///
/// assert_eq!(vec![1, 2, 3], store.mutate(pipeline).unwrap());
/// ```
pub type BoxedReducer<S> = Box<dyn FnOnce(&S) -> S>;

/// This trait is used for implementing variadic mutation pipelines.
///
/// The main goal is to let [`Store::mutate`](crate::Store::mutate) accept a
/// single reducer closure or a tuple of reducers of arbitrary size
///     `(|s: &S| ..., |s: &S| ..., |s: &S| ...)`
/// and fold them left-to-right over the current state.
///
/// Default implementations for tuples of 2 to 12 reducers are already
/// provided (see the `impl_reduce` macro). `()` and an empty
/// [`Vec<BoxedReducer<S>>`](BoxedReducer) are the explicit empty pipelines:
/// they fold to a clone of the incoming state, which the store commits and
/// notifies like any other mutation.
///
/// ```
/// use statefold::Store;
///
/// let store = Store::new(1);
/// let committed = store
///     .mutate((
///         |n: &i32| n + 1,
///         |n: &i32| n * 10,
///     ))
///     .unwrap();
///
/// assert_eq!(20, committed);
/// ```
pub trait Reduce<S> {
    fn fold(self, state: &S) -> S;
}

impl<S, F> Reduce<S> for F
where
    F: FnOnce(&S) -> S,
{
    fn fold(self, state: &S) -> S {
        self(state)
    }
}

impl<S: Clone> Reduce<S> for () {
    fn fold(self, state: &S) -> S {
        state.clone()
    }
}

impl<S: Clone> Reduce<S> for Vec<BoxedReducer<S>> {
    fn fold(self, state: &S) -> S {
        let mut reducers = self.into_iter();
        match reducers.next() {
            Some(first) => reducers.fold(first(state), |state, reducer| reducer(&state)),
            None => state.clone(),
        }
    }
}
