//! Fixed-size circular buffer of rate observations.

/// Number of rate samples averaged into the displayed rate and the ETA.
pub const SAMPLE_WINDOW: usize = 25;

/// The last [`SAMPLE_WINDOW`] instantaneous rates, in units per second.
///
/// Slots start at zero and the average always divides by the full window, so the
/// reported rate ramps up over the first [`SAMPLE_WINDOW`] ticks.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RateSamples {
    slots: [f64; SAMPLE_WINDOW],
    cursor: usize,
}

impl Default for RateSamples {
    fn default() -> Self {
        Self {
            slots: [0.0; SAMPLE_WINDOW],
            cursor: 0,
        }
    }
}

impl RateSamples {
    /// Stores `rate` at the cursor and advances it, overwriting the oldest sample.
    ///
    /// Non-finite rates are stored as `0.0` so they cannot poison the average.
    pub(crate) fn record(&mut self, rate: f64) {
        self.slots[self.cursor] = if rate.is_finite() { rate } else { 0.0 };
        self.cursor = (self.cursor + 1) % SAMPLE_WINDOW;
    }

    /// Arithmetic mean over every slot, unfilled ones included.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn average(&self) -> f64 {
        self.slots.iter().sum::<f64>() / SAMPLE_WINDOW as f64
    }
}
