//! Text rendering for progress lines and summaries.
//!
//! Every function here is pure: it formats numbers taken from a
//! [`TrackerSnapshot`] and never touches the tracker's lock.
//!
//! A rendered progress line looks like:
//!
//! ```text
//! ESC[2K ESC[80D 180 of 360 (50%) - RATE: 1.44 - ETA: 2m5s [=============-------------]
//! ```
//!
//! The leading control sequence erases the current terminal line and moves the cursor
//! back to its first column, so successive lines overwrite each other in place.

use std::{
    fmt::{self, Write as _},
    iter,
    time::Duration,
};

use crate::tracker::TrackerSnapshot;

/// Glyph for the completed part of the bar.
pub const FILL: char = '=';

/// Glyph for the remaining part of the bar.
pub const EMPTY: char = '-';

/// Largest ETA that is rendered: the longest whole-second span that fits in signed
/// 64-bit nanoseconds. Infinite estimates (a zero average rate) saturate here.
pub const MAX_ETA_SECS: i64 = i64::MAX / 1_000_000_000;

/// Columns taken by the `" ["` and `"]"` around the bar.
const BAR_FRAME: usize = 3;

/// A signed span of whole seconds, displayed as `[-][<h>h][<m>m]<s>s`.
///
/// ```
/// use eta_bar::render::WholeSeconds;
///
/// assert_eq!(WholeSeconds(0).to_string(), "0s");
/// assert_eq!(WholeSeconds(312).to_string(), "5m12s");
/// assert_eq!(WholeSeconds(3603).to_string(), "1h0m3s");
/// assert_eq!(WholeSeconds(-1).to_string(), "-1s");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct WholeSeconds(pub i64);

impl WholeSeconds {
    /// Rounds `duration` to the nearest second, halves away from zero.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn round(duration: Duration) -> Self {
        Self(duration.as_secs_f64().round() as i64)
    }
}

impl fmt::Display for WholeSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_char('-')?;
        }

        let secs = self.0.unsigned_abs();
        let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);

        if hours > 0 {
            write!(f, "{hours}h{minutes}m{seconds}s")
        } else if minutes > 0 {
            write!(f, "{minutes}m{seconds}s")
        } else {
            write!(f, "{seconds}s")
        }
    }
}

/// Whole seconds needed to cover `remaining` units at `rate` units per second.
///
/// Negative `remaining` (overshoot) gives a negative estimate. A zero rate with work
/// left saturates at [`MAX_ETA_SECS`].
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn eta_secs(remaining: f64, rate: f64) -> i64 {
    if remaining == 0.0 {
        return 0;
    }

    let secs = remaining / rate;
    if secs.is_nan() {
        return 0;
    }

    secs.round().clamp(-MAX_ETA_SECS as f64, MAX_ETA_SECS as f64) as i64
}

/// Number of fill glyphs for `fraction` of a `bar_width`-wide bar.
///
/// Out-of-range fractions clamp into `0..=bar_width`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub(crate) fn complete_width(bar_width: usize, fraction: f64) -> usize {
    let scaled = (fraction * bar_width as f64).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(bar_width)
    }
}

/// Appends `" [====----]"`, exactly `bar_width` glyphs between the brackets.
pub(crate) fn write_bar(buf: &mut String, bar_width: usize, fraction: f64) {
    let complete = complete_width(bar_width, fraction);

    buf.push_str(" [");
    buf.extend(iter::repeat_n(FILL, complete));
    buf.extend(iter::repeat_n(EMPTY, bar_width - complete));
    buf.push(']');
}

/// Appends the ANSI "erase line" and "cursor back `width` columns" sequences.
fn write_control_prefix(buf: &mut String, width: usize) {
    // Writing into a String cannot fail.
    let _ = write!(buf, "\x1b[2K\x1b[{width}D");
}

/// Renders the in-place progress line for `snap`, sized to `width` columns.
///
/// The bar takes whatever the status text leaves, and shrinks to an empty `" []"` when
/// the status alone is wider than `width`.
pub(crate) fn progress_line(snap: &TrackerSnapshot, width: usize) -> String {
    let mut buf = String::with_capacity(width + 16);
    write_control_prefix(&mut buf, width);

    let status_start = buf.len();
    let _ = write!(
        buf,
        "{} of {} ({}%) - RATE: {:.2} - ETA: {}",
        snap.progress(),
        snap.total(),
        snap.percent(),
        snap.rate(),
        WholeSeconds(snap.eta_secs()),
    );

    let status_len = buf.len() - status_start;
    let bar_width = width.saturating_sub(status_len + BAR_FRAME);
    write_bar(&mut buf, bar_width, snap.fraction());

    buf
}

/// Renders the newline-terminated completion summary for `snap`.
pub(crate) fn summary_line(snap: &TrackerSnapshot, width: usize) -> String {
    let mut buf = String::with_capacity(width + 16);
    write_control_prefix(&mut buf, width);

    let _ = writeln!(
        buf,
        "Completed {} records in {}",
        snap.progress(),
        WholeSeconds::round(snap.elapsed()),
    );

    buf
}
