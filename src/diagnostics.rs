//! Read-only snapshot of session state for overlays and logs.

use alloc::string::String;
use core::fmt;

use crate::profile::Profile;

/// Point-in-time view of a session, rebuilt on demand.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Normalized active destination, or `"n/a"` before init.
    pub destination_id: String,
    /// Active profile.
    pub profile: Profile,
    /// Master enable flag.
    pub enabled: bool,
    /// Auto-switch policy flag.
    pub auto_switch_enabled: bool,
    /// Shadow mode flag.
    pub shadow_mode: bool,
    /// Overlay visibility flag.
    pub hud_enabled: bool,
    /// Failsafe override flag.
    pub safety_failsafe_enabled: bool,
    /// Latency reported by the input; negative when unknown.
    pub latency_ms: i32,
    /// Current adaptive penalty in ticks.
    pub adaptive_penalty_ticks: u32,
    /// Grounded ticks required on the last eligible tick.
    pub required_grounded_ticks: u32,
    /// Confirmed attempts at the active destination.
    pub confirmed: u64,
    /// Rejected attempts at the active destination.
    pub rejected: u64,
    /// Shadow predictions at the active destination.
    pub shadow_predictions: u64,
    /// Smoothed rejection rate at the active destination.
    pub smoothed_rejection_rate: f64,
}

impl Diagnostics {
    /// Placeholder reported before the session is initialized.
    pub fn empty() -> Self {
        Self {
            destination_id: String::from("n/a"),
            profile: Profile::Smart,
            enabled: false,
            auto_switch_enabled: true,
            shadow_mode: false,
            hud_enabled: false,
            safety_failsafe_enabled: true,
            latency_ms: -1,
            adaptive_penalty_ticks: 0,
            required_grounded_ticks: 1,
            confirmed: 0,
            rejected: 0,
            shadow_predictions: 0,
            smoothed_rejection_rate: 0.0,
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Diagnostics {
    /// One-line overlay text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}{}] {} ping={} req={} pen={} ok={} rej={} rate={:.1}%",
            self.destination_id,
            self.profile,
            if self.auto_switch_enabled { "/auto" } else { "" },
            if !self.enabled {
                "off"
            } else if self.shadow_mode {
                "shadow"
            } else {
                "on"
            },
            self.latency_ms,
            self.required_grounded_ticks,
            self.adaptive_penalty_ticks,
            self.confirmed,
            self.rejected,
            self.smoothed_rejection_rate * 100.0,
        )
    }
}
