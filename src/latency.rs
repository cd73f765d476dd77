//! Reference latency tiers for host [`InputSource`] implementations.
//!
//! The core never measures latency itself. Hosts answer
//! [`InputSource::required_grounded_ticks_base`] however they like; this
//! module ships the mapping the reference client uses so a new host can
//! start from known-good numbers.
//!
//! | Band | Latency | Base ticks |
//! |------|---------|------------|
//! | `Local` | integrated session | 1 |
//! | `Low` | ≤ 80 ms | 2 |
//! | `Medium` | ≤ 150 ms, or unknown | 3 |
//! | `High` | ≤ 250 ms | 4 |
//! | `VeryHigh` | > 250 ms | 5 |
//!
//! [`InputSource`]: crate::input::InputSource
//! [`InputSource::required_grounded_ticks_base`]: crate::input::InputSource::required_grounded_ticks_base

/// Upper bound (inclusive) of the low-latency band, in ms.
pub const LOW_LATENCY_MAX_MS: i32 = 80;
/// Upper bound (inclusive) of the medium-latency band, in ms.
pub const MEDIUM_LATENCY_MAX_MS: i32 = 150;
/// Upper bound (inclusive) of the high-latency band, in ms.
pub const HIGH_LATENCY_MAX_MS: i32 = 250;

/// Quantised connection latency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LatencyBand {
    /// Integrated (in-process) session; no network hop.
    Local,
    /// Up to [`LOW_LATENCY_MAX_MS`].
    Low,
    /// Up to [`MEDIUM_LATENCY_MAX_MS`]. Also used when latency is unknown.
    Medium,
    /// Up to [`HIGH_LATENCY_MAX_MS`].
    High,
    /// Above [`HIGH_LATENCY_MAX_MS`].
    VeryHigh,
}

impl LatencyBand {
    /// Classify a remote latency reading. Negative means unknown.
    pub fn classify(latency_ms: i32) -> Self {
        if latency_ms < 0 {
            LatencyBand::Medium
        } else if latency_ms <= LOW_LATENCY_MAX_MS {
            LatencyBand::Low
        } else if latency_ms <= MEDIUM_LATENCY_MAX_MS {
            LatencyBand::Medium
        } else if latency_ms <= HIGH_LATENCY_MAX_MS {
            LatencyBand::High
        } else {
            LatencyBand::VeryHigh
        }
    }

    /// Grounded ticks a host should report for this band.
    pub const fn base_grounded_ticks(self) -> u32 {
        match self {
            LatencyBand::Local => 1,
            LatencyBand::Low => 2,
            LatencyBand::Medium => 3,
            LatencyBand::High => 4,
            LatencyBand::VeryHigh => 5,
        }
    }
}

/// Base grounded-tick requirement for a session.
///
/// `local` sessions always need a single tick; remote sessions map through
/// [`LatencyBand::classify`].
pub fn base_grounded_ticks(latency_ms: i32, local: bool) -> u32 {
    if local {
        LatencyBand::Local.base_grounded_ticks()
    } else {
        LatencyBand::classify(latency_ms).base_grounded_ticks()
    }
}
