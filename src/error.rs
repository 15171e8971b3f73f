//! Errors surfaced to callers.
//!
//! Only construction can fail. Every runtime edge case (zero elapsed time, a zero
//! average rate, overshooting the total) is absorbed and rendered as text instead.

/// Errors returned when constructing a [`Tracker`](crate::Tracker).
#[derive(Debug, thiserror::Error, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// A tracker needs a positive total to compute a percentage against.
    #[error("cannot create a progress tracker with a zero total")]
    ZeroTotal,

    /// The iterator did not report an exact length via `size_hint`.
    #[error("cannot infer a total from an iterator without an exact size hint")]
    UnknownLength,
}
