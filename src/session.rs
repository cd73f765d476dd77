/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Session coordinator: lifecycle, destination tracking and auto-switching.
//!
//! A [`Session`] owns the [`JumpController`], the [`RuntimeConfig`] and the
//! per-destination memories. The host calls [`Session::tick`] once per client
//! tick and the user-action entry points from its key bindings or menus.
//!
//! # Tick pipeline
//!
//! ```text
//! uninitialized? ──► no-op
//!      │
//! push shadow flag → controller.tick(enabled, profile)
//!      │
//! destination changed? ──► switch active id, recall profile, re-baseline deltas
//!      │
//! deltas (confirmed, rejected, shadow) ──► DestinationStats of active id
//!      │
//! auto-switch on? ──► policy (cooldown, min attempts, choose_profile)
//!      │
//! cooldown − 1
//! ```
//!
//! # Invariants
//!
//! - Outcomes observed before a destination switch are never credited to the
//!   new destination.
//! - At most [`DESTINATION_CAPACITY`] destinations are remembered, for both
//!   profiles and statistics. Each memory evicts its least recent entry.
//! - Manual profile selection always turns auto-switch off.
//! - Two automatic switches are at least [`AUTO_SWITCH_COOLDOWN_TICKS`] ticks apart.
//!
//! [`AUTO_SWITCH_COOLDOWN_TICKS`]: crate::policy::AUTO_SWITCH_COOLDOWN_TICKS

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::config::RuntimeConfig;
use crate::controller::JumpController;
use crate::diagnostics::Diagnostics;
use crate::input::{normalize_destination_id, InputSource, DEFAULT_DESTINATION_ID};
use crate::memory::{LruMemory, DESTINATION_CAPACITY};
use crate::policy::{choose_profile, SwitchCooldown};
use crate::profile::Profile;
use crate::stats::DestinationStats;

/// Callback told the new enabled state after every [`Session::toggle_enabled`].
pub type ToggleFeedback = Box<dyn FnMut(bool) + Send>;

/// Remembered profile per destination.
pub type ProfileMemory = LruMemory<Profile, DESTINATION_CAPACITY>;

/// Outcome statistics per destination.
pub type StatsMemory = LruMemory<DestinationStats, DESTINATION_CAPACITY>;

/// Adaptive jump session for one host client.
pub struct Session<I: InputSource> {
    controller: JumpController<I>,
    config: RuntimeConfig,
    enabled: bool,
    profile: Profile,
    initialized: bool,
    active_destination: String,
    profiles: ProfileMemory,
    stats: StatsMemory,
    last_confirmed: u32,
    last_rejected: u32,
    last_shadow: u32,
    cooldown: SwitchCooldown,
    toggle_feedback: Option<ToggleFeedback>,
}

impl<I: InputSource> Session<I> {
    /// Uninitialized session with default configuration.
    ///
    /// Ticks are ignored until [`init`](Session::init).
    pub fn new(input: I) -> Self {
        Self {
            controller: JumpController::new(input),
            config: RuntimeConfig::default(),
            enabled: false,
            profile: Profile::Smart,
            initialized: false,
            active_destination: String::from(DEFAULT_DESTINATION_ID),
            profiles: ProfileMemory::new(),
            stats: StatsMemory::new(),
            last_confirmed: 0,
            last_rejected: 0,
            last_shadow: 0,
            cooldown: SwitchCooldown::new(),
            toggle_feedback: None,
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────

    /// Enter the initialized state with a fresh controller, the default
    /// destination and gating enabled.
    ///
    /// Remembered profiles and statistics survive; the destination reported
    /// on the first tick is adopted and its profile recalled then.
    pub fn init(&mut self) {
        self.enabled = true;
        self.controller.reset();
        self.active_destination = String::from(DEFAULT_DESTINATION_ID);
        self.profile = self.recall_profile();
        self.rebaseline();
        self.cooldown.reset();
        self.controller.set_shadow_mode(self.config.shadow_mode());
        self.initialized = true;
        tracing::info!(
            destination = %self.active_destination,
            profile = %self.profile,
            "jump session initialized"
        );
    }

    /// Replace the configuration, then [`init`](Session::init).
    pub fn init_with_config(&mut self, config: RuntimeConfig) {
        self.replace_config(config);
        self.init();
    }

    /// Leave the initialized state. Memories and configuration are kept.
    pub fn teardown(&mut self) {
        self.initialized = false;
        self.cooldown.reset();
        tracing::info!(destination = %self.active_destination, "jump session torn down");
    }

    /// `true` between [`init`](Session::init) and [`teardown`](Session::teardown).
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Seed remembered profiles, typically from host persistence.
    ///
    /// Keys are normalized. Later entries count as more recently used.
    pub fn restore_profiles<'a>(&mut self, entries: impl IntoIterator<Item = (&'a str, Profile)>) {
        for (id, profile) in entries {
            self.profiles.insert(&normalize_destination_id(id), profile);
        }
    }

    /// Seed destination statistics. Keys are normalized; later entries count
    /// as more recently used.
    pub fn restore_stats<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, DestinationStats)>,
    ) {
        for (id, stats) in entries {
            self.stats.insert(&normalize_destination_id(id), stats);
        }
    }

    // ── Tick ───────────────────────────────────────────────────────────────

    /// Advance one client tick. No-op while uninitialized.
    pub fn tick(&mut self) {
        if !self.initialized {
            return;
        }

        self.controller.set_shadow_mode(self.config.shadow_mode());
        self.controller.tick(self.enabled, self.profile);

        self.sync_destination();
        self.feed_stats();
        if self.config.auto_switch_enabled() {
            self.apply_auto_switch();
        }
        self.cooldown.tick();
    }

    fn sync_destination(&mut self) {
        let id = normalize_destination_id(self.controller.destination_id());
        if id == self.active_destination {
            return;
        }
        tracing::debug!(from = %self.active_destination, to = %id, "destination changed");
        self.active_destination = id;
        self.profile = self.recall_profile();
        self.rebaseline();
    }

    fn feed_stats(&mut self) {
        let confirmed = self.controller.confirmed_count();
        let rejected = self.controller.rejected_count();
        let shadow = self.controller.shadow_prediction_count();

        let d_confirmed = i64::from(confirmed) - i64::from(self.last_confirmed);
        let d_rejected = i64::from(rejected) - i64::from(self.last_rejected);
        let d_shadow = i64::from(shadow) - i64::from(self.last_shadow);

        self.last_confirmed = confirmed;
        self.last_rejected = rejected;
        self.last_shadow = shadow;

        self.stats
            .get_or_insert_with(&self.active_destination, DestinationStats::new)
            .update(d_confirmed, d_rejected, d_shadow);
    }

    fn apply_auto_switch(&mut self) {
        if self.cooldown.is_active() {
            return;
        }
        let Some(stats) = self.stats.peek(&self.active_destination) else {
            return;
        };
        if stats.attempts() < u64::from(self.config.min_attempts_for_auto_switch()) {
            return;
        }

        let latency_ms = self.controller.latency_ms();
        let rate = stats.smoothed_rejection_rate();
        let target = choose_profile(latency_ms, rate, &self.config);
        if target == self.profile {
            return;
        }

        tracing::debug!(
            destination = %self.active_destination,
            latency_ms,
            rejection_rate = rate,
            from = %self.profile,
            to = %target,
            "auto-switching jump profile"
        );
        self.profile = target;
        self.profiles.insert(&self.active_destination, target);
        self.cooldown.start();
    }

    fn recall_profile(&mut self) -> Profile {
        self.profiles
            .get(&self.active_destination)
            .copied()
            .unwrap_or_default()
    }

    fn rebaseline(&mut self) {
        self.last_confirmed = self.controller.confirmed_count();
        self.last_rejected = self.controller.rejected_count();
        self.last_shadow = self.controller.shadow_prediction_count();
    }

    // ── User actions ───────────────────────────────────────────────────────

    /// Flip the master enable flag and notify the feedback callback.
    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        tracing::debug!(enabled = self.enabled, "jump gating toggled");
        if let Some(feedback) = self.toggle_feedback.as_mut() {
            feedback(self.enabled);
        }
        self.enabled
    }

    /// Set the master enable flag without notifying feedback.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Install the callback run after every [`toggle_enabled`](Session::toggle_enabled).
    pub fn set_toggle_feedback(&mut self, feedback: impl FnMut(bool) + Send + 'static) {
        self.toggle_feedback = Some(Box::new(feedback));
    }

    /// Select the next profile manually. Turns auto-switch off.
    pub fn cycle_profile(&mut self) -> Profile {
        self.set_profile(self.profile.next());
        self.profile
    }

    /// Select `profile` manually and remember it for the active destination.
    ///
    /// Turns auto-switch off. The cooldown is left as is.
    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.profiles.insert(&self.active_destination, profile);
        self.config.set_auto_switch_enabled(false);
        tracing::debug!(destination = %self.active_destination, %profile, "jump profile set manually");
    }

    /// Flip shadow mode; takes effect on the controller immediately.
    pub fn toggle_shadow_mode(&mut self) -> bool {
        let shadow = !self.config.shadow_mode();
        self.config.set_shadow_mode(shadow);
        self.controller.set_shadow_mode(shadow);
        tracing::debug!(shadow, "shadow mode toggled");
        shadow
    }

    /// Flip the auto-switch policy.
    pub fn toggle_auto_switch(&mut self) -> bool {
        let auto = !self.config.auto_switch_enabled();
        self.config.set_auto_switch_enabled(auto);
        tracing::debug!(auto, "auto-switch toggled");
        auto
    }

    /// Flip the failsafe override.
    pub fn toggle_safety_failsafe(&mut self) -> bool {
        let failsafe = !self.config.safety_failsafe_enabled();
        self.config.set_safety_failsafe_enabled(failsafe);
        tracing::debug!(failsafe, "safety failsafe toggled");
        failsafe
    }

    /// Flip overlay visibility.
    pub fn toggle_hud(&mut self) -> bool {
        let hud = !self.config.hud_enabled();
        self.config.set_hud_enabled(hud);
        hud
    }

    /// See [`RuntimeConfig::set_min_attempts_for_auto_switch`].
    pub fn set_min_attempts_for_auto_switch(&mut self, attempts: u32) -> u32 {
        self.config.set_min_attempts_for_auto_switch(attempts)
    }

    /// See [`RuntimeConfig::set_competitive_rejection_max`].
    pub fn set_competitive_rejection_max(&mut self, rate: f64) -> f64 {
        self.config.set_competitive_rejection_max(rate)
    }

    /// See [`RuntimeConfig::set_stable_rejection_min`].
    pub fn set_stable_rejection_min(&mut self, rate: f64) -> f64 {
        self.config.set_stable_rejection_min(rate)
    }

    /// See [`RuntimeConfig::set_failsafe_rejection_rate`].
    pub fn set_failsafe_rejection_rate(&mut self, rate: f64) -> f64 {
        self.config.set_failsafe_rejection_rate(rate)
    }

    /// See [`RuntimeConfig::adjust_min_attempts`].
    pub fn adjust_min_attempts(&mut self, delta: i32) -> u32 {
        self.config.adjust_min_attempts(delta)
    }

    /// See [`RuntimeConfig::adjust_competitive_rejection_max`].
    pub fn adjust_competitive_rejection_max(&mut self, delta: f64) -> f64 {
        self.config.adjust_competitive_rejection_max(delta)
    }

    /// See [`RuntimeConfig::adjust_stable_rejection_min`].
    pub fn adjust_stable_rejection_min(&mut self, delta: f64) -> f64 {
        self.config.adjust_stable_rejection_min(delta)
    }

    /// See [`RuntimeConfig::adjust_failsafe_rejection_rate`].
    pub fn adjust_failsafe_rejection_rate(&mut self, delta: f64) -> f64 {
        self.config.adjust_failsafe_rejection_rate(delta)
    }

    /// Restore the default configuration.
    pub fn reset_config(&mut self) {
        self.replace_config(RuntimeConfig::default());
        tracing::debug!("jump settings reset to defaults");
    }

    /// Install `config` after normalizing it.
    pub fn replace_config(&mut self, mut config: RuntimeConfig) {
        config.normalize();
        self.config = config;
        self.controller.set_shadow_mode(self.config.shadow_mode());
    }

    /// Forget every remembered profile and statistic; fall back to `Smart`.
    pub fn clear_destination_memory(&mut self) {
        self.profiles.clear();
        self.stats.clear();
        self.profile = Profile::Smart;
        tracing::info!("destination memory cleared");
    }

    // ── Queries ────────────────────────────────────────────────────────────

    /// Current configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Active profile.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Master enable flag.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Normalized id of the destination outcomes are attributed to.
    pub fn active_destination(&self) -> &str {
        &self.active_destination
    }

    /// Profile remembered for `destination_id`, without touching recency.
    pub fn remembered_profile(&self, destination_id: &str) -> Option<Profile> {
        self.profiles
            .peek(&normalize_destination_id(destination_id))
            .copied()
    }

    /// Statistics for `destination_id`, without touching recency.
    pub fn destination_stats(&self, destination_id: &str) -> Option<&DestinationStats> {
        self.stats.peek(&normalize_destination_id(destination_id))
    }

    /// All remembered profiles.
    pub fn profile_memory(&self) -> &ProfileMemory {
        &self.profiles
    }

    /// All destination statistics.
    pub fn stats_memory(&self) -> &StatsMemory {
        &self.stats
    }

    /// Ticks before another automatic switch may fire.
    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown.remaining()
    }

    /// The underlying controller.
    pub fn controller(&self) -> &JumpController<I> {
        &self.controller
    }

    /// Borrow the host input.
    pub fn input(&self) -> &I {
        self.controller.input()
    }

    /// Mutably borrow the host input.
    pub fn input_mut(&mut self) -> &mut I {
        self.controller.input_mut()
    }

    /// Presentation snapshot; [`Diagnostics::empty`] while uninitialized.
    pub fn diagnostics(&self) -> Diagnostics {
        if !self.initialized {
            return Diagnostics::empty();
        }
        let stats = self.stats.peek(&self.active_destination);
        Diagnostics {
            destination_id: self.active_destination.clone(),
            profile: self.profile,
            enabled: self.enabled,
            auto_switch_enabled: self.config.auto_switch_enabled(),
            shadow_mode: self.config.shadow_mode(),
            hud_enabled: self.config.hud_enabled(),
            safety_failsafe_enabled: self.config.safety_failsafe_enabled(),
            latency_ms: self.controller.latency_ms(),
            adaptive_penalty_ticks: self.controller.adaptive_penalty_ticks(),
            required_grounded_ticks: self.controller.required_grounded_ticks(),
            confirmed: stats.map_or(0, DestinationStats::confirmed),
            rejected: stats.map_or(0, DestinationStats::rejected),
            shadow_predictions: stats.map_or(0, DestinationStats::shadow_predictions),
            smoothed_rejection_rate: stats.map_or(0.0, DestinationStats::smoothed_rejection_rate),
        }
    }
}

impl<I: InputSource + fmt::Debug> fmt::Debug for Session<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("controller", &self.controller)
            .field("config", &self.config)
            .field("enabled", &self.enabled)
            .field("profile", &self.profile)
            .field("initialized", &self.initialized)
            .field("active_destination", &self.active_destination)
            .field("profiles", &self.profiles.len())
            .field("stats", &self.stats.len())
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
