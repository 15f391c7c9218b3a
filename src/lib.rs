//! Synchronous Single-Owner Observable State Container

mod error;
mod macros;
mod reduce;
mod store;
mod subscription;

pub use error::StoreError;
pub use reduce::{BoxedReducer, Reduce};
pub use store::Store;
pub use subscription::Subscription;
