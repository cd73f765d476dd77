//! Runtime configuration: feature flags and auto-switch thresholds.
//!
//! The three rejection-rate thresholds are kept ordered after every change:
//!
//! ```text
//! competitive_rejection_max ≤ stable_rejection_min ≤ failsafe_rejection_rate
//! ```
//!
//! Ordering is restored by raising the later thresholds, never by lowering
//! the one just written. Setting the competitive ceiling to 0.72 and then the
//! stable floor to 0.31 leaves the stable floor at 0.72.

/// Smallest accepted minimum sample size for auto-switching.
pub const MIN_ATTEMPTS_FLOOR: u32 = 2;

/// Flags and thresholds that tune the session at runtime.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeConfig {
    auto_switch_enabled: bool,
    shadow_mode: bool,
    safety_failsafe_enabled: bool,
    hud_enabled: bool,
    min_attempts_for_auto_switch: u32,
    competitive_rejection_max: f64,
    stable_rejection_min: f64,
    failsafe_rejection_rate: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            auto_switch_enabled: true,
            shadow_mode: false,
            safety_failsafe_enabled: true,
            hud_enabled: false,
            min_attempts_for_auto_switch: 8,
            competitive_rejection_max: 0.08,
            stable_rejection_min: 0.30,
            failsafe_rejection_rate: 0.45,
        }
    }
}

impl RuntimeConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Flags ──────────────────────────────────────────────────────────────

    /// Whether the auto-switch policy runs.
    pub fn auto_switch_enabled(&self) -> bool {
        self.auto_switch_enabled
    }

    /// Enable or disable the auto-switch policy.
    pub fn set_auto_switch_enabled(&mut self, enabled: bool) {
        self.auto_switch_enabled = enabled;
    }

    /// Whether jumps are predicted instead of issued.
    pub fn shadow_mode(&self) -> bool {
        self.shadow_mode
    }

    /// Enable or disable shadow mode.
    pub fn set_shadow_mode(&mut self, shadow: bool) {
        self.shadow_mode = shadow;
    }

    /// Whether a high rejection rate forces `Stable`.
    pub fn safety_failsafe_enabled(&self) -> bool {
        self.safety_failsafe_enabled
    }

    /// Enable or disable the failsafe override.
    pub fn set_safety_failsafe_enabled(&mut self, enabled: bool) {
        self.safety_failsafe_enabled = enabled;
    }

    /// Whether the host should draw its diagnostics overlay.
    pub fn hud_enabled(&self) -> bool {
        self.hud_enabled
    }

    /// Show or hide the diagnostics overlay.
    pub fn set_hud_enabled(&mut self, enabled: bool) {
        self.hud_enabled = enabled;
    }

    // ── Thresholds ─────────────────────────────────────────────────────────

    /// Attempts a destination needs before the policy may switch its profile.
    pub fn min_attempts_for_auto_switch(&self) -> u32 {
        self.min_attempts_for_auto_switch
    }

    /// Rejection rate at or below which `Competitive` may be chosen.
    pub fn competitive_rejection_max(&self) -> f64 {
        self.competitive_rejection_max
    }

    /// Rejection rate at or above which `Stable` is chosen.
    pub fn stable_rejection_min(&self) -> f64 {
        self.stable_rejection_min
    }

    /// Rejection rate at or above which the failsafe forces `Stable`.
    pub fn failsafe_rejection_rate(&self) -> f64 {
        self.failsafe_rejection_rate
    }

    /// Set the minimum sample size, floored at [`MIN_ATTEMPTS_FLOOR`].
    pub fn set_min_attempts_for_auto_switch(&mut self, attempts: u32) -> u32 {
        self.min_attempts_for_auto_switch = attempts.max(MIN_ATTEMPTS_FLOOR);
        self.min_attempts_for_auto_switch
    }

    /// Set the competitive ceiling; returns the stored value.
    pub fn set_competitive_rejection_max(&mut self, rate: f64) -> f64 {
        self.competitive_rejection_max = clamp_rate(rate, self.competitive_rejection_max);
        self.normalize();
        self.competitive_rejection_max
    }

    /// Set the stable floor; returns the stored value after ordering.
    pub fn set_stable_rejection_min(&mut self, rate: f64) -> f64 {
        self.stable_rejection_min = clamp_rate(rate, self.stable_rejection_min);
        self.normalize();
        self.stable_rejection_min
    }

    /// Set the failsafe trigger; returns the stored value after ordering.
    pub fn set_failsafe_rejection_rate(&mut self, rate: f64) -> f64 {
        self.failsafe_rejection_rate = clamp_rate(rate, self.failsafe_rejection_rate);
        self.normalize();
        self.failsafe_rejection_rate
    }

    /// Shift the minimum sample size by `delta`.
    pub fn adjust_min_attempts(&mut self, delta: i32) -> u32 {
        let next = self.min_attempts_for_auto_switch.saturating_add_signed(delta);
        self.set_min_attempts_for_auto_switch(next)
    }

    /// Shift the competitive ceiling by `delta`.
    pub fn adjust_competitive_rejection_max(&mut self, delta: f64) -> f64 {
        self.set_competitive_rejection_max(self.competitive_rejection_max + delta)
    }

    /// Shift the stable floor by `delta`.
    pub fn adjust_stable_rejection_min(&mut self, delta: f64) -> f64 {
        self.set_stable_rejection_min(self.stable_rejection_min + delta)
    }

    /// Shift the failsafe trigger by `delta`.
    pub fn adjust_failsafe_rejection_rate(&mut self, delta: f64) -> f64 {
        self.set_failsafe_rejection_rate(self.failsafe_rejection_rate + delta)
    }

    /// Restore every range and ordering rule.
    ///
    /// Setters call this already; it is public for values that arrive by
    /// deserialization.
    pub fn normalize(&mut self) {
        self.min_attempts_for_auto_switch = self.min_attempts_for_auto_switch.max(MIN_ATTEMPTS_FLOOR);
        self.competitive_rejection_max = clamp_rate(self.competitive_rejection_max, 0.0);
        self.stable_rejection_min = clamp_rate(self.stable_rejection_min, 0.0)
            .max(self.competitive_rejection_max);
        self.failsafe_rejection_rate = clamp_rate(self.failsafe_rejection_rate, 0.0)
            .max(self.stable_rejection_min);
    }
}

/// Clamp into `[0, 1]`; NaN keeps `fallback`.
fn clamp_rate(rate: f64, fallback: f64) -> f64 {
    if rate.is_nan() {
        fallback
    } else {
        rate.clamp(0.0, 1.0)
    }
}
