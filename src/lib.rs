//! # `eta_bar`
//!
//! A single-line terminal progress bar with a smoothed rate and an ETA.
//!
//! Each rendered line overwrites the previous one in place:
//!
//! ```text
//! 180 of 360 (50%) - RATE: 36.00 - ETA: 5s [==================------------------]
//! ```
//!
//! and a final summary reports the total time taken:
//!
//! ```text
//! Completed 360 records in 10s
//! ```
//!
//! The rate is a moving average over the last
//! [`SAMPLE_WINDOW`](samples::SAMPLE_WINDOW) ticks. Unfilled samples count as zero,
//! so the displayed rate ramps up over the first few ticks.
//!
//! ## Modules
//!
//! * [`builder`]: Fluent interface for constructing [`Tracker`] instances.
//! * [`tracker`]: The [`Tracker`] handle, its tick operations and snapshots.
//! * [`render`]: Pure formatting of progress lines, bars and durations.
//! * [`samples`]: The fixed-size window of rate samples.
//! * [`width`]: Terminal width discovery.
//! * [`iter`]: Extension traits for ticking a tracker from an Iterator.
//! * [`io`]: Wrappers for [`std::io::Read`] and [`std::io::Write`] that tick per byte.
//!
//! ## Example
//!
//! ```
//! use eta_bar::Tracker;
//!
//! let bar = Tracker::builder(100u64).with_width(80).build()?;
//! for _ in 0..100 {
//!     bar.advance_by(1u64);
//!     print!("{}", bar.render_progress());
//! }
//! print!("{}", bar.render_summary());
//! # Ok::<(), eta_bar::Error>(())
//! ```
//!
//! ## Concurrent use
//!
//! [`Tracker`] handles are cheap to clone and synchronized internally, so a worker can
//! tick while another thread polls and prints:
//!
//! ```no_run
//! use std::{sync::mpsc, thread, time::Duration};
//!
//! use eta_bar::Tracker;
//!
//! let bar = Tracker::new(10u64)?;
//! let (done_tx, done_rx) = mpsc::channel();
//!
//! let worker = bar.clone();
//! thread::spawn(move || {
//!     for _ in 0..10 {
//!         worker.advance_by(1u64);
//!         thread::sleep(Duration::from_secs(1));
//!     }
//!     let _ = done_tx.send(());
//! });
//!
//! while done_rx.recv_timeout(Duration::from_millis(500)).is_err() {
//!     print!("{}", bar.render_progress());
//! }
//! print!("{}", bar.render_summary());
//! # Ok::<(), eta_bar::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod builder;
pub mod error;
pub mod io;
pub mod iter;
pub mod render;
pub mod samples;
pub mod tracker;
pub mod width;

pub use builder::TrackerBuilder;
pub use error::Error;
pub use iter::{TickingIter, TrackerIteratorExt};
pub use tracker::{Tracker, TrackerSnapshot};
pub use width::{FALLBACK_WIDTH, FixedWidth, SttyProbe, WidthProbe};
