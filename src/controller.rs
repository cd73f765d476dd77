/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Per-tick jump gating state machine.
//!
//! - [`JumpController`]: decides on each tick whether a held jump key becomes
//!   a real jump, and infers server acceptance from the vertical position.
//! - [`AttemptState`]: whether an issued jump is still awaiting its outcome.
//!
//! # Tick order
//!
//! ```text
//! disabled? ──yes──► frozen
//!     │
//! resolve in-flight attempt (confirm on rise / reject on timeout)
//!     │
//! airborne? ──yes──► reset grounded + since-attempt counters
//!     │
//! count grounded tick
//!     │
//! key held, nothing in flight, both counters ≥ required?
//!     │
//!     ├── shadow mode ──► record prediction only
//!     └── otherwise ────► issue jump, start awaiting result
//! ```
//!
//! # Invariants
//!
//! - **Single flight**: a second jump is never issued while a result is pending.
//! - **Bounded penalty**: `adaptive_penalty_ticks` stays in
//!   `[0, profile.max_adaptive_penalty_ticks()]`.
//! - **Frozen when disabled**: a disabled tick reads and writes nothing.
//! - **Rejection bias**: an unknown (NaN) position never confirms an attempt.

use crate::input::InputSource;
use crate::profile::Profile;

/// Ticks after an attempt within which a rise must be observed.
pub const RESULT_TIMEOUT_TICKS: u32 = 3;

/// Minimum vertical rise over the start position that counts as a jump.
pub const MIN_RISE: f64 = 0.005;

/// Whether an issued jump is still waiting for its outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttemptState {
    /// Nothing in flight.
    Idle,
    /// A jump was issued and its outcome is not yet known.
    AwaitingResult {
        /// Ticks remaining before the attempt counts as rejected.
        ticks_left: u32,
        /// Vertical position when the jump was issued (may be NaN).
        start_y: f64,
    },
}

/// How an in-flight attempt resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The player rose: the server executed the jump.
    Confirmed,
    /// No rise within the timeout: treated as a server rejection.
    Rejected,
}

/// What the controller did with the jump key on a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JumpAction {
    /// No jump this tick.
    #[default]
    None,
    /// A real jump was issued through the input.
    Issued,
    /// Shadow mode: the tick was eligible but only a prediction was recorded.
    Predicted,
}

/// Summary of one [`JumpController::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Resolution of a pending attempt, if one resolved this tick.
    pub resolved: Option<AttemptOutcome>,
    /// Jump decision for this tick.
    pub action: JumpAction,
}

/// Adaptive jump gate for one session.
///
/// Owns the host [`InputSource`]. Counters are cumulative until
/// [`reset`](JumpController::reset); per-destination attribution happens
/// upstream in the session by diffing them.
#[derive(Debug)]
pub struct JumpController<I: InputSource> {
    input: I,
    grounded_ticks: u32,
    ticks_since_last_attempt: u32,
    adaptive_penalty_ticks: u32,
    successful_streak: u32,
    confirmed_count: u32,
    rejected_count: u32,
    shadow_prediction_count: u32,
    last_required_grounded_ticks: u32,
    shadow_mode: bool,
    attempt: AttemptState,
}

impl<I: InputSource> JumpController<I> {
    /// Construct a controller with zeroed counters around `input`.
    pub fn new(input: I) -> Self {
        Self {
            input,
            grounded_ticks: 0,
            ticks_since_last_attempt: 0,
            adaptive_penalty_ticks: 0,
            successful_streak: 0,
            confirmed_count: 0,
            rejected_count: 0,
            shadow_prediction_count: 0,
            last_required_grounded_ticks: 1,
            shadow_mode: false,
            attempt: AttemptState::Idle,
        }
    }

    /// Return every per-session field to its initial value, dropping any
    /// in-flight attempt unresolved. The input and shadow flag are kept.
    pub fn reset(&mut self) {
        self.grounded_ticks = 0;
        self.ticks_since_last_attempt = 0;
        self.adaptive_penalty_ticks = 0;
        self.successful_streak = 0;
        self.confirmed_count = 0;
        self.rejected_count = 0;
        self.shadow_prediction_count = 0;
        self.last_required_grounded_ticks = 1;
        self.attempt = AttemptState::Idle;
    }

    /// Advance one tick under `profile`.
    ///
    /// When `enabled` is `false` the controller is frozen: no input is read,
    /// no field changes and no jump is issued.
    pub fn tick(&mut self, enabled: bool, profile: Profile) -> TickReport {
        let mut report = TickReport::default();
        if !enabled {
            return report;
        }

        // A profile switch can lower the ceiling below the current penalty.
        self.adaptive_penalty_ticks = self
            .adaptive_penalty_ticks
            .min(profile.max_adaptive_penalty_ticks());

        report.resolved = self.resolve_attempt(profile);

        if !self.input.is_grounded() {
            self.grounded_ticks = 0;
            self.ticks_since_last_attempt = 0;
            return report;
        }

        self.grounded_ticks = self.grounded_ticks.saturating_add(1);
        self.ticks_since_last_attempt = self.ticks_since_last_attempt.saturating_add(1);

        if !self.input.is_jump_held() || self.is_awaiting_result() {
            return report;
        }

        let required = self.required_ticks(profile);
        self.last_required_grounded_ticks = required;

        if self.grounded_ticks < required || self.ticks_since_last_attempt < required {
            return report;
        }

        self.ticks_since_last_attempt = 0;
        if self.shadow_mode {
            self.shadow_prediction_count = self.shadow_prediction_count.saturating_add(1);
            report.action = JumpAction::Predicted;
            return report;
        }

        let start_y = self.input.vertical_position();
        self.input.issue_jump();
        self.attempt = AttemptState::AwaitingResult {
            ticks_left: RESULT_TIMEOUT_TICKS,
            start_y,
        };
        report.action = JumpAction::Issued;
        report
    }

    /// `max(1, base + profile offset + adaptive penalty)`.
    fn required_ticks(&self, profile: Profile) -> u32 {
        let base = i64::from(self.input.required_grounded_ticks_base());
        let raw = base
            + i64::from(profile.grounded_ticks_offset())
            + i64::from(self.adaptive_penalty_ticks);
        u32::try_from(raw.max(1)).unwrap_or(u32::MAX)
    }

    fn resolve_attempt(&mut self, profile: Profile) -> Option<AttemptOutcome> {
        let AttemptState::AwaitingResult { ticks_left, start_y } = self.attempt else {
            return None;
        };

        // NaN on either side compares false, so unknown positions never confirm.
        let current_y = self.input.vertical_position();
        if current_y > start_y + MIN_RISE {
            self.on_confirmed(profile);
            return Some(AttemptOutcome::Confirmed);
        }

        let ticks_left = ticks_left.saturating_sub(1);
        if ticks_left == 0 {
            self.on_rejected(profile);
            return Some(AttemptOutcome::Rejected);
        }
        self.attempt = AttemptState::AwaitingResult { ticks_left, start_y };
        None
    }

    fn on_confirmed(&mut self, profile: Profile) {
        self.attempt = AttemptState::Idle;
        self.confirmed_count = self.confirmed_count.saturating_add(1);
        self.successful_streak = self.successful_streak.saturating_add(1);

        if self.adaptive_penalty_ticks > 0
            && self.successful_streak >= profile.successes_to_reduce_penalty()
        {
            self.adaptive_penalty_ticks -= 1;
            self.successful_streak = 0;
        }
        tracing::trace!(
            penalty = self.adaptive_penalty_ticks,
            streak = self.successful_streak,
            "jump confirmed"
        );
    }

    fn on_rejected(&mut self, profile: Profile) {
        self.attempt = AttemptState::Idle;
        self.successful_streak = 0;
        self.rejected_count = self.rejected_count.saturating_add(1);
        self.adaptive_penalty_ticks = self
            .adaptive_penalty_ticks
            .saturating_add(1)
            .min(profile.max_adaptive_penalty_ticks());
        tracing::trace!(penalty = self.adaptive_penalty_ticks, "jump rejected");
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    /// Enable or disable shadow mode (predict without jumping).
    pub fn set_shadow_mode(&mut self, shadow_mode: bool) {
        self.shadow_mode = shadow_mode;
    }

    /// `true` when shadow mode is active.
    pub fn shadow_mode(&self) -> bool {
        self.shadow_mode
    }

    /// Current in-flight state.
    pub fn attempt(&self) -> AttemptState {
        self.attempt
    }

    /// `true` while an issued jump is awaiting its outcome.
    pub fn is_awaiting_result(&self) -> bool {
        matches!(self.attempt, AttemptState::AwaitingResult { .. })
    }

    /// Ticks of continuous ground contact.
    pub fn grounded_ticks(&self) -> u32 {
        self.grounded_ticks
    }

    /// Grounded ticks since the last attempt or prediction.
    pub fn ticks_since_last_attempt(&self) -> u32 {
        self.ticks_since_last_attempt
    }

    /// Extra delay currently added on top of the base requirement.
    pub fn adaptive_penalty_ticks(&self) -> u32 {
        self.adaptive_penalty_ticks
    }

    /// Consecutive confirmations since the last rejection or penalty decay.
    pub fn successful_streak(&self) -> u32 {
        self.successful_streak
    }

    /// Requirement computed on the most recent eligible tick (at least 1).
    pub fn required_grounded_ticks(&self) -> u32 {
        self.last_required_grounded_ticks.max(1)
    }

    /// Cumulative confirmed attempts.
    pub fn confirmed_count(&self) -> u32 {
        self.confirmed_count
    }

    /// Cumulative rejected attempts.
    pub fn rejected_count(&self) -> u32 {
        self.rejected_count
    }

    /// Cumulative shadow predictions.
    pub fn shadow_prediction_count(&self) -> u32 {
        self.shadow_prediction_count
    }

    /// Latency as reported by the input.
    pub fn latency_ms(&self) -> i32 {
        self.input.latency_ms()
    }

    /// Raw destination identifier as reported by the input.
    pub fn destination_id(&self) -> &str {
        self.input.destination_id()
    }

    /// Borrow the host input.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Mutably borrow the host input.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Consume the controller, returning the host input.
    pub fn into_input(self) -> I {
        self.input
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
