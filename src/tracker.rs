//! The progress tracker and its snapshots.
//!
//! A [`Tracker`] is a cloneable handle. Its configuration (total, width, start time)
//! is fixed at construction and copied into every clone, while the tick state
//! (progress, time of the last tick, rate samples) sits behind a single
//! [`Mutex`](parking_lot::Mutex). Progress and samples must change together, so a
//! lock is used instead of separate atomics.
//!
//! # Rendering
//!
//! [`Tracker::render_progress`] and [`Tracker::render_summary`] lock once to copy a
//! [`TrackerSnapshot`], then format without holding the lock. A worker thread can keep
//! ticking while another thread prints.

use std::{fmt, sync::Arc, time::Duration};

use parking_lot::Mutex;
use web_time::Instant;

use crate::{
    builder::TrackerBuilder,
    error::Error,
    render::{self, eta_secs},
    samples::RateSamples,
};

/// A thread-safe, cloneable handle to a single progress bar.
///
/// Clones share the same underlying state; ticking through one is visible in all.
#[derive(Clone)]
pub struct Tracker {
    pub(crate) total: u64,
    pub(crate) width: usize,
    pub(crate) start: Instant,
    pub(crate) state: Arc<Mutex<TickState>>,
}

/// Mutable state updated on every tick.
#[derive(Debug)]
pub(crate) struct TickState {
    progress: u64,
    last_tick: Instant,
    samples: RateSamples,
}

impl TickState {
    pub(crate) fn new(start: Instant) -> Self {
        Self {
            progress: 0,
            last_tick: start,
            samples: RateSamples::default(),
        }
    }

    /// Moves to `progress` and records the rate since the previous tick.
    ///
    /// A tick at the same instant as the previous one records a rate of zero.
    #[allow(clippy::cast_precision_loss)]
    fn tick(&mut self, progress: u64, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_tick).as_secs_f64();
        let delta = progress as f64 - self.progress as f64;
        let rate = if elapsed > 0.0 { delta / elapsed } else { 0.0 };

        self.samples.record(rate);
        self.last_tick = now;
        self.progress = progress;
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("total", &self.total)
            .field("width", &self.width)
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}

impl Tracker {
    /// Creates a tracker for `total` units, starting now, with a probed width.
    ///
    /// Use [`TrackerBuilder`] to set the width or start time explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroTotal`] if `total` is zero.
    pub fn new(total: impl Into<u64>) -> Result<Self, Error> {
        TrackerBuilder::new(total).build()
    }

    /// Returns a builder for a tracker of `total` units.
    #[must_use]
    pub fn builder(total: impl Into<u64>) -> TrackerBuilder {
        TrackerBuilder::new(total)
    }

    // ========================================================================
    // Ticks
    // ========================================================================

    /// Sets the absolute progress and records the rate since the previous tick.
    ///
    /// Moving backwards is accepted: it records a negative rate and lowers the
    /// rendered percentage.
    pub fn set_progress(&self, progress: u64) {
        self.set_progress_at(progress, Instant::now());
    }

    /// Advances the progress by `delta` units, saturating at `u64::MAX`.
    pub fn advance_by(&self, delta: impl Into<u64>) {
        self.advance_by_at(delta.into(), Instant::now());
    }

    pub(crate) fn set_progress_at(&self, progress: u64, now: Instant) {
        self.state.lock().tick(progress, now);
    }

    pub(crate) fn advance_by_at(&self, delta: u64, now: Instant) {
        let mut state = self.state.lock();
        let progress = state.progress.saturating_add(delta);
        state.tick(progress, now);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Gets the current progress.
    #[must_use]
    pub fn progress(&self) -> u64 {
        self.state.lock().progress
    }

    /// Gets the total the tracker was created with.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Gets the display width in columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Gets the instant progress started.
    #[must_use]
    pub const fn start(&self) -> Instant {
        self.start
    }

    /// Gets the smoothed rate in units per second.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.state.lock().samples.average()
    }

    /// Duration since the start time, zero if the start lies in the future.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.start)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Creates a consistent snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub(crate) fn snapshot_at(&self, now: Instant) -> TrackerSnapshot {
        let state = self.state.lock();
        let progress = state.progress;
        let rate = state.samples.average();
        drop(state);

        TrackerSnapshot {
            progress,
            total: self.total,
            rate,
            elapsed: now.saturating_duration_since(self.start),
        }
    }

    /// Renders the progress line, prefixed with the control sequence that overwrites
    /// the previous line and without a trailing newline.
    #[must_use]
    pub fn render_progress(&self) -> String {
        self.snapshot().render_line(self.width)
    }

    /// Renders the newline-terminated completion summary.
    #[must_use]
    pub fn render_summary(&self) -> String {
        self.snapshot().render_summary(self.width)
    }
}

/// A plain-data view of a [`Tracker`] at one instant.
///
/// Holds owned data, so derived metrics and rendering require no locking.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "rkyv", rkyv(derive(Debug, PartialEq)))]
pub struct TrackerSnapshot {
    progress: u64,
    total: u64,
    rate: f64,
    elapsed: Duration,
}

impl TrackerSnapshot {
    /// Returns the progress.
    #[must_use]
    pub const fn progress(&self) -> u64 {
        self.progress
    }

    /// Returns the total.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the smoothed rate in units per second.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the time elapsed since the tracker's start.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Completed share of the total. Exceeds `1.0` on overshoot.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.progress as f64 / self.total as f64
    }

    /// Completed percentage, truncated to a whole number and saturating at
    /// `u64::MAX` for extreme overshoot.
    #[must_use]
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        // Integer math: 29 of 100 must read 29%, not 28%.
        let percent = u128::from(self.progress) * 100 / u128::from(self.total);
        u64::try_from(percent).unwrap_or(u64::MAX)
    }

    /// Estimated whole seconds until the total is reached at the smoothed rate.
    ///
    /// Negative after overshoot; saturates at
    /// [`MAX_ETA_SECS`](crate::render::MAX_ETA_SECS) when the rate is zero.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn eta_secs(&self) -> i64 {
        let remaining = self.total as f64 - self.progress as f64;
        eta_secs(remaining, self.rate)
    }

    /// Renders the progress line for a terminal `width` columns wide.
    #[must_use]
    pub fn render_line(&self, width: usize) -> String {
        render::progress_line(self, width)
    }

    /// Renders the completion summary line.
    #[must_use]
    pub fn render_summary(&self, width: usize) -> String {
        render::summary_line(self, width)
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use web_time::Instant;

    use super::Tracker;
    use crate::{
        Error,
        render::{EMPTY, FILL},
    };

    const CONTROL_PREFIX_80: &str = "\x1b[2K\x1b[80D";

    fn tracker(total: u64, width: usize, start: Instant) -> Tracker {
        Tracker::builder(total)
            .with_width(width)
            .with_start_time(start)
            .build()
            .unwrap()
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    /// Extracts (fill, empty) glyph counts from the bracketed bar at the end of `line`.
    fn bar_counts(line: &str) -> (usize, usize) {
        let open = line.rfind('[').unwrap();
        let bar = &line[open + 1..line.len() - 1];
        (
            bar.chars().filter(|c| *c == FILL).count(),
            bar.chars().filter(|c| *c == EMPTY).count(),
        )
    }

    /// Construction
    /// A zero total is rejected; anything else starts at zero progress.
    #[test]
    fn test_construction() {
        assert_eq!(Tracker::new(0u64).unwrap_err(), Error::ZeroTotal);

        let t = tracker(10, 80, Instant::now());
        assert_eq!(t.progress(), 0);
        assert_eq!(t.total(), 10);
        assert_eq!(t.width(), 80);
    }

    /// Absolute and Relative Ticks
    /// `advance_by` is `set_progress(current + delta)`.
    #[test]
    fn test_ticks() {
        let t = tracker(100, 80, Instant::now());

        t.set_progress(40);
        assert_eq!(t.progress(), 40);

        t.advance_by(15u64);
        assert_eq!(t.progress(), 55);

        t.set_progress(7);
        assert_eq!(t.progress(), 7, "regressions are accepted");

        t.set_progress(u64::MAX - 1);
        t.advance_by(5u64);
        assert_eq!(t.progress(), u64::MAX, "advance saturates");
    }

    /// Halfway Line
    /// 180 of 360 at width 80 renders 50% and a half-filled bar.
    #[test]
    fn test_halfway_line() {
        let start = Instant::now();
        let t = tracker(360, 80, start);
        t.set_progress_at(180, start + secs(5));

        let line = t.snapshot_at(start + secs(5)).render_line(t.width());
        assert!(line.starts_with(CONTROL_PREFIX_80));
        assert!(!line.ends_with('\n'));

        let visible = &line[CONTROL_PREFIX_80.len()..];
        assert!(visible.starts_with("180 of 360 (50%) - RATE: "), "{visible}");
        assert_eq!(visible.chars().count(), 80, "{visible}");

        let (fill, empty) = bar_counts(visible);
        assert!(fill.abs_diff(empty) <= 1, "{visible}");
    }

    /// Deterministic Rate and ETA
    /// One tick of 10 units in 1s is diluted over the sample window.
    #[test]
    fn test_rate_and_eta() {
        let start = Instant::now();
        let t = tracker(100, 80, start);
        let now = start + secs(1);

        t.set_progress_at(10, now);
        let snap = t.snapshot_at(now);

        assert!((snap.rate() - 0.4).abs() < 1e-9);
        assert_eq!(snap.eta_secs(), 225);
        assert_eq!(snap.percent(), 10);

        let line = snap.render_line(80);
        assert!(line.contains("10 of 100 (10%) - RATE: 0.40 - ETA: 3m45s ["), "{line}");
    }

    /// Summary Line
    /// Reports the total and the elapsed time since start.
    #[test]
    fn test_summary() {
        let start = Instant::now();
        let t = tracker(100, 80, start);
        t.set_progress_at(100, start + secs(9));

        let summary = t
            .snapshot_at(start + secs(10) + Duration::from_millis(400))
            .render_summary(t.width());
        assert!(summary.starts_with(CONTROL_PREFIX_80));
        assert!(summary.ends_with('\n'));

        let visible = summary[CONTROL_PREFIX_80.len()..].trim_end();
        assert_eq!(visible, "Completed 100 records in 10s");

        // The live render measures from the real start time.
        assert!(t.render_summary().contains("Completed 100 records in 0s"));
    }

    /// Zero Elapsed Ticks
    /// Ticks within the same instant never render NaN or infinity.
    #[test]
    fn test_zero_elapsed_ticks() {
        let start = Instant::now();
        let t = tracker(50, 80, start);

        t.set_progress_at(10, start);
        t.set_progress_at(20, start);

        let snap = t.snapshot_at(start);
        assert!(snap.rate().is_finite());

        let line = snap.render_line(80);
        assert!(!line.contains("NaN") && !line.contains("inf"), "{line}");
        assert!(line.contains("RATE: 0.00 - ETA: 2562047h47m16s"), "{line}");
    }

    /// Regression and Overshoot
    /// Going backwards or past the total still renders a well-formed line.
    #[test]
    fn test_regression_and_overshoot() {
        let start = Instant::now();
        let t = tracker(100, 80, start);

        t.set_progress_at(80, start + secs(1));
        let before = t.snapshot_at(start + secs(1)).percent();

        t.set_progress_at(30, start + secs(2));
        let after = t.snapshot_at(start + secs(2));
        assert!(after.percent() < before);
        assert!(after.render_line(80).contains("30 of 100 (30%)"));

        t.set_progress_at(150, start + secs(3));
        let over = t.snapshot_at(start + secs(3));
        assert_eq!(over.percent(), 150);
        assert!(over.eta_secs() < 0);

        let line = over.render_line(80);
        let (fill, empty) = bar_counts(&line);
        assert_eq!(empty, 0, "{line}");
        assert!(fill > 0, "{line}");
    }

    /// Extreme Overshoot
    /// A percentage beyond `u64` saturates instead of wrapping.
    #[test]
    fn test_percent_saturates() {
        let start = Instant::now();
        let t = tracker(1, 80, start);
        t.set_progress_at(u64::MAX, start + secs(1));

        let snap = t.snapshot_at(start + secs(1));
        assert_eq!(snap.percent(), u64::MAX);

        let line = snap.render_line(80);
        assert!(
            line.contains(&format!("{} of 1 ({}%)", u64::MAX, u64::MAX)),
            "{line}"
        );
    }

    /// Narrow Terminal
    /// A status wider than the terminal leaves an empty bar instead of failing.
    #[test]
    fn test_narrow_width() {
        let t = tracker(1_000_000, 10, Instant::now());
        t.set_progress(500_000);

        let line = t.render_progress();
        assert!(line.ends_with(" []"), "{line}");
    }

    /// Producer and Poller
    /// One thread ticks while another renders from a cloned handle.
    #[test]
    fn test_concurrent_producer_and_poller() {
        let t = tracker(1000, 80, Instant::now());

        let producer = {
            let t = t.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    t.advance_by(1u64);
                }
            })
        };

        let poller = {
            let t = t.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let line = t.render_progress();
                    assert!(line.contains(" of 1000 ("));
                }
            })
        };

        producer.join().unwrap();
        poller.join().unwrap();

        assert_eq!(t.progress(), 1000);
        assert!(t.render_summary().contains("Completed 1000 records in "));
    }
}
