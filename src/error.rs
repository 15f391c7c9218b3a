//! Error taxonomy for store mutations.

use thiserror::Error;

/// Errors surfaced by [`Store::mutate`](crate::Store::mutate).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("mutation already in progress; overlapping mutate calls are rejected")]
    ReentrantMutation,
}
