//! End-to-end session behaviour: destination attribution, auto-switching,
//! bounded memory and user actions, driven through a scripted input.

mod common;

use common::ScriptedInput;
use jumptune_core::policy::AUTO_SWITCH_COOLDOWN_TICKS;
use jumptune_core::{Profile, Session, DESTINATION_CAPACITY};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn started(input: ScriptedInput) -> Session<ScriptedInput> {
    let mut s = Session::new(input);
    s.init();
    s
}

/// Tick until the profile leaves `from`; returns the number of ticks taken.
fn tick_until_switch(s: &mut Session<ScriptedInput>, from: Profile, limit: u32) -> Option<u32> {
    for n in 1..=limit {
        s.tick();
        if s.profile() != from {
            return Some(n);
        }
    }
    None
}

// ── Destination attribution ──────────────────────────────────────────────────

#[test]
fn test_first_tick_adopts_reported_destination() {
    let mut s = started(ScriptedInput::rejecting().at("  Alpha.Example "));
    assert_eq!(s.active_destination(), "global");
    s.tick();
    assert_eq!(s.active_destination(), "alpha.example");
    assert!(s.destination_stats("global").is_none());
}

#[test]
fn test_outcomes_never_leak_across_destinations() {
    let mut s = started(ScriptedInput::rejecting());
    for _ in 0..40 {
        s.tick();
    }
    // Let the in-flight attempt resolve before leaving.
    s.input_mut().held = false;
    for _ in 0..5 {
        s.tick();
    }
    let alpha_rejected = s.destination_stats("alpha.example").map(|st| st.rejected());
    assert_eq!(alpha_rejected, Some(u64::from(s.controller().rejected_count())));
    let before_switch = s.controller().rejected_count();

    s.input_mut().destination = String::from("beta.example");
    s.input_mut().held = true;
    s.tick();
    let beta = s.destination_stats("beta.example").cloned().unwrap_or_default();
    assert_eq!(beta.attempts(), 0, "alpha history credited to beta");

    for _ in 0..10 {
        s.tick();
    }
    let beta = s.destination_stats("beta.example").cloned().unwrap_or_default();
    assert_eq!(
        beta.rejected(),
        u64::from(s.controller().rejected_count() - before_switch)
    );
    assert_eq!(
        s.destination_stats("alpha.example").map(|st| st.rejected()),
        alpha_rejected,
        "alpha changed after leaving it"
    );
}

#[test]
fn test_profile_follows_destination() {
    let mut s = started(ScriptedInput::rejecting());
    s.tick();
    s.set_profile(Profile::Stable);

    s.input_mut().destination = String::from("beta.example");
    s.tick();
    assert_eq!(s.profile(), Profile::Smart);

    s.input_mut().destination = String::from("ALPHA.example");
    s.tick();
    assert_eq!(s.profile(), Profile::Stable);
}

#[test]
fn test_blank_destination_maps_to_global() {
    let mut s = started(ScriptedInput::rejecting().at("   "));
    s.tick();
    assert_eq!(s.active_destination(), "global");
    assert!(s.destination_stats("global").is_some());
}

// ── Auto-switch ──────────────────────────────────────────────────────────────

#[test]
fn test_auto_switch_waits_for_min_attempts() {
    let mut s = started(ScriptedInput::rejecting());
    let min = u64::from(s.config().min_attempts_for_auto_switch());

    let mut switched = false;
    for _ in 0..200 {
        s.tick();
        let attempts = s
            .destination_stats("alpha.example")
            .map_or(0, |st| st.attempts());
        if s.profile() != Profile::Smart {
            assert_eq!(attempts, min, "switched at the wrong sample size");
            switched = true;
            break;
        }
        assert!(attempts < min, "eligible but did not switch");
    }
    assert!(switched);
    assert_eq!(s.profile(), Profile::Stable);
    assert_eq!(s.remembered_profile("alpha.example"), Some(Profile::Stable));
}

#[test]
fn test_raised_min_attempts_delays_switch() {
    let mut s = started(ScriptedInput::rejecting());
    assert_eq!(s.set_min_attempts_for_auto_switch(20), 20);
    tick_until_switch(&mut s, Profile::Smart, 1_000).expect("never switched");
    let attempts = s.destination_stats("alpha.example").map(|st| st.attempts());
    assert_eq!(attempts, Some(20));
}

#[test]
fn test_cooldown_spaces_automatic_switches() {
    let mut s = started(ScriptedInput::rejecting());
    tick_until_switch(&mut s, Profile::Smart, 200).expect("never switched");
    assert_eq!(s.profile(), Profile::Stable);
    assert_eq!(s.cooldown_remaining(), AUTO_SWITCH_COOLDOWN_TICKS - 1);

    // Every rate now qualifies for Competitive at 40 ms.
    s.set_competitive_rejection_max(1.0);
    for n in 1..AUTO_SWITCH_COOLDOWN_TICKS {
        s.tick();
        assert_eq!(s.profile(), Profile::Stable, "switched during cooldown at +{n}");
    }
    s.tick();
    assert_eq!(s.profile(), Profile::Competitive);
}

#[test]
fn test_high_latency_picks_stable_even_when_clean() {
    let mut s = started(ScriptedInput::confirming().with_latency(260));
    tick_until_switch(&mut s, Profile::Smart, 100).expect("never switched");
    assert_eq!(s.profile(), Profile::Stable);
}

#[test]
fn test_clean_low_latency_picks_competitive() {
    let mut s = started(ScriptedInput::confirming().with_latency(30));
    tick_until_switch(&mut s, Profile::Smart, 100).expect("never switched");
    assert_eq!(s.profile(), Profile::Competitive);
    let stats = s.destination_stats("alpha.example").cloned().unwrap_or_default();
    assert_eq!(stats.rejected(), 0);
    assert_eq!(stats.smoothed_rejection_rate(), 0.0);
}

#[test]
fn test_manual_selection_disables_auto_switch() {
    let mut s = started(ScriptedInput::rejecting());
    s.tick();
    s.set_profile(Profile::Competitive);
    assert!(!s.config().auto_switch_enabled());
    for _ in 0..300 {
        s.tick();
    }
    assert_eq!(s.profile(), Profile::Competitive);
}

#[test]
fn test_manual_selection_keeps_cooldown() {
    let mut s = started(ScriptedInput::rejecting());
    tick_until_switch(&mut s, Profile::Smart, 200).expect("never switched");
    let remaining = s.cooldown_remaining();
    s.cycle_profile();
    assert_eq!(s.cooldown_remaining(), remaining);
}

// ── Gating through the session ───────────────────────────────────────────────

#[test]
fn test_shadow_mode_never_jumps() {
    let mut s = started(ScriptedInput::rejecting());
    assert!(s.toggle_shadow_mode());
    for _ in 0..10 {
        s.tick();
    }
    assert_eq!(s.input().jumps, 0);
    let stats = s.destination_stats("alpha.example").cloned().unwrap_or_default();
    // The first prediction lands before the destination is adopted.
    assert_eq!(stats.shadow_predictions(), 9);
    assert_eq!(stats.attempts(), 0);
}

#[test]
fn test_disabled_session_only_observes() {
    let mut s = started(ScriptedInput::rejecting());
    s.set_enabled(false);
    for _ in 0..20 {
        s.tick();
    }
    assert_eq!(s.input().jumps, 0);
    assert_eq!(s.controller().grounded_ticks(), 0);
    let stats = s.destination_stats("alpha.example").cloned().unwrap_or_default();
    assert_eq!(stats.attempts(), 0);
}

#[test]
fn test_diagnostics_track_penalty() {
    let mut s = started(ScriptedInput::rejecting());
    for _ in 0..10 {
        s.tick();
    }
    let d = s.diagnostics();
    assert_eq!(d.destination_id, "alpha.example");
    assert_eq!(d.profile, Profile::Smart);
    assert_eq!(d.rejected, 3);
    assert_eq!(d.adaptive_penalty_ticks, 3);
    assert_eq!(d.required_grounded_ticks, 4);
    assert!(d.smoothed_rejection_rate > 0.4);
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

#[test]
fn test_reinit_starts_a_fresh_controller() {
    let mut s = started(ScriptedInput::rejecting());
    for _ in 0..10 {
        s.tick();
    }
    assert_eq!(s.controller().adaptive_penalty_ticks(), 3);

    s.teardown();
    s.init();
    assert_eq!(s.active_destination(), "global");
    assert_eq!(s.controller().adaptive_penalty_ticks(), 0);
    assert_eq!(s.controller().successful_streak(), 0);
    assert_eq!(s.controller().grounded_ticks(), 0);
    assert!(!s.controller().is_awaiting_result());
    assert_eq!(s.diagnostics().required_grounded_ticks, 1);

    s.tick();
    assert_eq!(s.active_destination(), "alpha.example");
    assert_eq!(s.diagnostics().adaptive_penalty_ticks, 0);
}

#[test]
fn test_attempt_in_flight_at_teardown_is_never_credited() {
    let mut s = started(ScriptedInput::rejecting());
    while !s.controller().is_awaiting_result() {
        s.tick();
    }
    let before = s.destination_stats("alpha.example").cloned().unwrap_or_default();
    assert_eq!(before.confirmed(), 0);

    s.teardown();
    s.init();
    // The rise that would have confirmed the old attempt.
    s.input_mut().held = false;
    s.input_mut().y += 1.0;
    for _ in 0..5 {
        s.tick();
    }

    let after = s.destination_stats("alpha.example").cloned().unwrap_or_default();
    assert_eq!(after.confirmed(), 0);
    assert_eq!(after.rejected(), before.rejected());
    assert_eq!(s.controller().confirmed_count(), 0);
    assert_eq!(s.controller().rejected_count(), 0);
}

#[test]
fn test_reinit_keeps_remembered_profiles() {
    let mut s = started(ScriptedInput::rejecting());
    s.tick();
    s.set_profile(Profile::Competitive);

    s.teardown();
    s.init();
    assert_eq!(s.profile(), Profile::Smart, "global has no remembered profile");
    s.tick();
    assert_eq!(s.profile(), Profile::Competitive);
}

// ── Bounded memory ───────────────────────────────────────────────────────────

#[test]
fn test_memory_evicts_least_recent_destination() {
    let mut s = started(ScriptedInput::rejecting());
    for i in 0..=DESTINATION_CAPACITY {
        s.input_mut().destination = format!("srv-{i}");
        s.tick();
        s.set_profile(Profile::Stable);
    }
    assert_eq!(s.profile_memory().len(), DESTINATION_CAPACITY);
    assert_eq!(s.stats_memory().len(), DESTINATION_CAPACITY);
    assert_eq!(s.remembered_profile("srv-0"), None);
    assert!(s.destination_stats("srv-0").is_none());
    assert_eq!(
        s.remembered_profile(&format!("srv-{DESTINATION_CAPACITY}")),
        Some(Profile::Stable)
    );
}

#[test]
fn test_revisiting_protects_destination_from_eviction() {
    let mut s = started(ScriptedInput::rejecting());
    let visit = |s: &mut Session<ScriptedInput>, id: &str| {
        s.input_mut().destination = String::from(id);
        s.tick();
        s.set_profile(Profile::Competitive);
    };

    for i in 0..DESTINATION_CAPACITY {
        visit(&mut s, &format!("srv-{i}"));
    }
    visit(&mut s, "srv-0");
    visit(&mut s, "srv-new");

    assert_eq!(s.remembered_profile("srv-0"), Some(Profile::Competitive));
    assert_eq!(s.remembered_profile("srv-1"), None);
    assert!(s.destination_stats("srv-1").is_none());
}

// ── User actions ─────────────────────────────────────────────────────────────

#[test]
fn test_threshold_ordering_through_session() {
    let mut s = started(ScriptedInput::rejecting());
    s.set_competitive_rejection_max(0.72);
    assert_eq!(s.set_stable_rejection_min(0.31), 0.72);
    assert!(s.config().failsafe_rejection_rate() >= 0.72);
}

#[test]
fn test_clear_memory_then_reinit() {
    let mut s = started(ScriptedInput::rejecting());
    s.tick();
    s.set_profile(Profile::Stable);
    s.clear_destination_memory();
    assert_eq!(s.profile(), Profile::Smart);

    s.teardown();
    s.init();
    s.tick();
    assert_eq!(s.profile(), Profile::Smart);
    assert!(s.is_initialized());
}

#[test]
fn test_toggles_round_trip() {
    let mut s = started(ScriptedInput::rejecting());
    assert!(!s.toggle_auto_switch());
    assert!(s.toggle_auto_switch());
    assert!(!s.toggle_safety_failsafe());
    assert!(s.toggle_hud());
    assert!(s.diagnostics().hud_enabled);
    assert!(!s.diagnostics().safety_failsafe_enabled);
}
