/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Per-destination jump outcome statistics.
//!
//! [`DestinationStats`] accumulates confirmed, rejected and shadow counts for
//! one destination and keeps an exponential moving average of the rejection
//! fraction:
//!
//! ```text
//! sample > 0:  rate ← rate × 0.82 + (rejected / sample) × 0.18
//! sample = 0:  rate ← rate × 0.998
//! ```
//!
//! where `sample = confirmed_delta + rejected_delta`. The idle decay pulls a
//! stale rate toward zero while nothing is being attempted.

/// Weight kept from the previous rate on each sampled update.
pub const RATE_RETAIN: f64 = 0.82;
/// Weight given to the new batch rejection fraction.
pub const RATE_WEIGHT: f64 = 0.18;
/// Multiplicative decay applied on updates with no attempts.
pub const IDLE_DECAY: f64 = 0.998;

/// Smoothed jump outcome statistics for one destination.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestinationStats {
    confirmed: u64,
    rejected: u64,
    shadow_predictions: u64,
    smoothed_rejection_rate: f64,
}

impl DestinationStats {
    /// Fresh statistics: all counts zero, rate 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one tick's worth of outcome deltas.
    ///
    /// Negative deltas are treated as zero.
    pub fn update(&mut self, confirmed_delta: i64, rejected_delta: i64, shadow_delta: i64) {
        let confirmed = clamp_delta(confirmed_delta);
        let rejected = clamp_delta(rejected_delta);
        let shadow = clamp_delta(shadow_delta);

        self.confirmed = self.confirmed.saturating_add(confirmed);
        self.rejected = self.rejected.saturating_add(rejected);
        self.shadow_predictions = self.shadow_predictions.saturating_add(shadow);

        let sample = confirmed.saturating_add(rejected);
        if sample > 0 {
            let batch = rejected as f64 / sample as f64;
            self.smoothed_rejection_rate =
                self.smoothed_rejection_rate * RATE_RETAIN + batch * RATE_WEIGHT;
        } else {
            self.smoothed_rejection_rate *= IDLE_DECAY;
        }
    }

    /// Total confirmed attempts.
    pub fn confirmed(&self) -> u64 {
        self.confirmed
    }

    /// Total rejected attempts.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Total shadow-mode predictions.
    pub fn shadow_predictions(&self) -> u64 {
        self.shadow_predictions
    }

    /// `confirmed + rejected`.
    pub fn attempts(&self) -> u64 {
        self.confirmed.saturating_add(self.rejected)
    }

    /// Exponentially smoothed rejection fraction in `[0, 1]`.
    pub fn smoothed_rejection_rate(&self) -> f64 {
        self.smoothed_rejection_rate
    }

    /// Rebuild from persisted parts. The rate is clamped to `[0, 1]`; NaN reads as 0.
    pub fn from_parts(
        confirmed: u64,
        rejected: u64,
        shadow_predictions: u64,
        smoothed_rejection_rate: f64,
    ) -> Self {
        let rate = if smoothed_rejection_rate.is_nan() {
            0.0
        } else {
            smoothed_rejection_rate.clamp(0.0, 1.0)
        };
        Self {
            confirmed,
            rejected,
            shadow_predictions,
            smoothed_rejection_rate: rate,
        }
    }
}

fn clamp_delta(delta: i64) -> u64 {
    u64::try_from(delta).unwrap_or(0)
}
