/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Auto-switch profile selection.
//!
//! [`choose_profile`] maps a destination's latency and smoothed rejection
//! rate to a target profile:
//!
//! ```text
//! rate ≥ stable_min  or  latency ≥ 210 ms        → Stable
//! rate ≤ competitive_max  and  0 ≤ latency ≤ 95  → Competitive
//! otherwise                                      → Smart
//! failsafe on  and  rate ≥ failsafe_rate         → Stable (overrides all)
//! ```
//!
//! Unknown latency (negative) never qualifies for `Competitive`.
//!
//! [`SwitchCooldown`] blocks further automatic switches for
//! [`AUTO_SWITCH_COOLDOWN_TICKS`] ticks after one fires.

use crate::config::RuntimeConfig;
use crate::profile::Profile;

/// Latency at or above which `Stable` is chosen regardless of rate.
pub const STABLE_LATENCY_MS: i32 = 210;
/// Highest latency that still qualifies for `Competitive`.
pub const COMPETITIVE_LATENCY_MS: i32 = 95;
/// Ticks during which no automatic switch may follow another.
pub const AUTO_SWITCH_COOLDOWN_TICKS: u32 = 40;

/// Target profile for a destination with the given latency and rejection rate.
pub fn choose_profile(latency_ms: i32, rejection_rate: f64, config: &RuntimeConfig) -> Profile {
    if config.safety_failsafe_enabled() && rejection_rate >= config.failsafe_rejection_rate() {
        return Profile::Stable;
    }
    if rejection_rate >= config.stable_rejection_min() || latency_ms >= STABLE_LATENCY_MS {
        Profile::Stable
    } else if rejection_rate <= config.competitive_rejection_max()
        && (0..=COMPETITIVE_LATENCY_MS).contains(&latency_ms)
    {
        Profile::Competitive
    } else {
        Profile::Smart
    }
}

/// Tick-counted hold-off between automatic switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwitchCooldown {
    remaining: u32,
}

impl SwitchCooldown {
    /// Inactive cooldown.
    pub const fn new() -> Self {
        Self { remaining: 0 }
    }

    /// Begin a full cooldown.
    pub fn start(&mut self) {
        self.remaining = AUTO_SWITCH_COOLDOWN_TICKS;
    }

    /// `true` while switches are blocked.
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Ticks left before switches are allowed again.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Count down one tick.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Cancel any active cooldown.
    pub fn reset(&mut self) {
        self.remaining = 0;
    }
}
