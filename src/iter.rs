//! Iterator adapters for automatic progress tracking.
//!
//! This module provides the [`TrackerIteratorExt`] trait, which adds helper methods to
//! any Rust [`Iterator`] so a loop can tick a [`Tracker`] with a single method call.
//!
//! # Example
//!
//! ```
//! use eta_bar::{Tracker, TrackerIteratorExt as _};
//!
//! let bar = Tracker::builder(3u64).with_width(80).build()?;
//! for _record in ["a", "b", "c"].iter().ticking(&bar) {
//!     // ...
//! }
//! assert_eq!(bar.progress(), 3);
//! # Ok::<(), eta_bar::Error>(())
//! ```

use crate::{error::Error, tracker::Tracker};

/// An iterator adapter that advances a [`Tracker`] by one for every item yielded.
pub struct TickingIter<I> {
    iter: I,
    tracker: Tracker,
}

impl<I> TickingIter<I> {
    /// Creates a new `TickingIter`.
    ///
    /// Note: This is usually constructed via [`TrackerIteratorExt`] methods.
    pub const fn new(iter: I, tracker: Tracker) -> Self {
        Self { iter, tracker }
    }

    /// Returns the tracker being advanced, e.g. to render it mid-loop.
    pub const fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}

impl<I: Iterator> Iterator for TickingIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next();
        if item.is_some() {
            self.tracker.advance_by(1u64);
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Extension trait to attach progress tracking to any Iterator.
pub trait TrackerIteratorExt: Iterator + Sized {
    /// Wraps the iterator so every item advances `tracker` by one.
    fn ticking(self, tracker: &Tracker) -> TickingIter<Self>;

    /// Wraps the iterator in a new [`Tracker`] whose total is the iterator's length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLength`] if `size_hint` is not exact, or
    /// [`Error::ZeroTotal`] if the iterator is empty.
    fn ticking_bar(self) -> Result<TickingIter<Self>, Error>;
}

impl<I: Iterator> TrackerIteratorExt for I {
    fn ticking(self, tracker: &Tracker) -> TickingIter<Self> {
        TickingIter::new(self, tracker.clone())
    }

    fn ticking_bar(self) -> Result<TickingIter<Self>, Error> {
        let (lower, upper) = self.size_hint();
        // Only an exact size hint gives a usable total.
        match upper {
            Some(upper) if upper == lower => {
                let tracker = Tracker::new(upper as u64)?;
                Ok(TickingIter::new(self, tracker))
            }
            _ => Err(Error::UnknownLength),
        }
    }
}
