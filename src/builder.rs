//! Fluent interface for constructing [`Tracker`] instances.
//!
//! [`Tracker::new`] covers the common case: a known total, the terminal's width and a
//! start time of "now". The [`TrackerBuilder`] is the configuration record for
//! everything else.
//!
//! # Key Features
//!
//! * **Fixed Width:** Skip terminal probing entirely, e.g. when output goes to a log
//!   file or a pipe.
//! * **Injected Probe:** Substitute any [`WidthProbe`] for the default `stty` probe.
//! * **Time Travel:** Explicitly set the `start` time, useful when the work began
//!   before the tracker was created. The elapsed time in the summary counts from it.

use std::sync::Arc;

use parking_lot::Mutex;
use web_time::Instant;

use crate::{
    error::Error,
    tracker::{TickState, Tracker},
    width::{FALLBACK_WIDTH, SttyProbe, WidthProbe},
};

/// A builder for [`Tracker`] instances.
///
/// ```
/// use eta_bar::TrackerBuilder;
///
/// let bar = TrackerBuilder::new(360u64).with_width(80).build()?;
/// bar.set_progress(180);
/// assert!(bar.render_progress().contains("180 of 360 (50%)"));
/// # Ok::<(), eta_bar::Error>(())
/// ```
#[derive(Default)]
#[must_use]
pub struct TrackerBuilder {
    total: u64,
    width: Option<usize>,
    start: Option<Instant>,
    probe: Option<Box<dyn WidthProbe>>,
}

impl TrackerBuilder {
    /// Starts building a tracker for `total` units.
    pub fn new(total: impl Into<u64>) -> Self {
        Self {
            total: total.into(),
            ..Default::default()
        }
    }

    /// Sets the display width in columns. A width of 0 probes the terminal.
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the probe used when no explicit width is given.
    pub fn with_width_probe(mut self, probe: impl WidthProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Sets the start time explicitly.
    pub const fn with_start_time(mut self, start: Instant) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the start time to `Instant::now()`.
    pub fn with_start_time_now(self) -> Self {
        self.with_start_time(Instant::now())
    }

    /// Consumes the builder and returns the constructed [`Tracker`].
    ///
    /// Probes the terminal width at most once, here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroTotal`] if the total is zero.
    pub fn build(self) -> Result<Tracker, Error> {
        if self.total == 0 {
            return Err(Error::ZeroTotal);
        }

        let width = match self.width {
            Some(width) if width > 0 => width,
            _ => self.probe_width(),
        };
        let start = self.start.unwrap_or_else(Instant::now);

        tracing::debug!(total = self.total, width, "progress tracker created");

        Ok(Tracker {
            total: self.total,
            width,
            start,
            state: Arc::new(Mutex::new(TickState::new(start))),
        })
    }

    fn probe_width(&self) -> usize {
        let columns = self
            .probe
            .as_deref()
            .map_or_else(|| SttyProbe.columns(), |probe| probe.columns());

        if columns == 0 {
            tracing::warn!(fallback = FALLBACK_WIDTH, "width probe reported zero columns");
            FALLBACK_WIDTH
        } else {
            columns
        }
    }
}
