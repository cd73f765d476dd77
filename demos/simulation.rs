//! # Adaptive Jump Timing Simulation
//!
//! Plays a bunny-hopping player across three servers with very different
//! network conditions. Shows the adaptive penalty rising on rejections,
//! per-destination statistics, auto-switching with cooldown, and profile
//! recall when the player reconnects to a server it has seen before.
//!
//! Run with: `cargo run --example simulation`

use jumptune_core::latency::base_grounded_ticks;
use jumptune_core::{Diagnostics, InputSource, Profile, Session};
use rand::prelude::*;
use rand::rngs::StdRng;

// ── Simulated client ─────────────────────────────────────────────────────────

const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

struct Server {
    name: &'static str,
    latency_ms: i32,
    /// Ticks the server needs to see the player grounded before it accepts a jump.
    landing_ticks: u32,
    /// Percentage of otherwise valid jumps lost in transit.
    loss_pct: u64,
}

const SERVERS: [Server; 3] = [
    Server { name: "lan.local", latency_ms: 4, landing_ticks: 1, loss_pct: 0 },
    Server { name: "EU.Example.net", latency_ms: 70, landing_ticks: 2, loss_pct: 3 },
    Server { name: "far-away.example", latency_ms: 240, landing_ticks: 5, loss_pct: 20 },
];

const AIRTIME_TICKS: u32 = 8;
const GROUND_Y: f64 = 64.0;

struct SimClient {
    server: usize,
    grounded_for: u32,
    airborne_left: u32,
    y: f64,
    rng: StdRng,
    issued: u32,
    landed: u32,
}

impl SimClient {
    fn new() -> Self {
        Self {
            server: 0,
            grounded_for: 0,
            airborne_left: 0,
            y: GROUND_Y,
            rng: StdRng::seed_from_u64(SEED),
            issued: 0,
            landed: 0,
        }
    }

    fn server(&self) -> &Server {
        &SERVERS[self.server]
    }

    fn connect(&mut self, server: usize) {
        self.server = server;
        self.issued = 0;
        self.landed = 0;
    }

    /// Physics step, run before the session tick.
    fn advance(&mut self) {
        if self.airborne_left > 0 {
            self.airborne_left -= 1;
            self.y = if self.airborne_left == 0 { GROUND_Y } else { self.y + 0.1 };
            self.grounded_for = 0;
        } else {
            self.grounded_for += 1;
        }
    }
}

impl InputSource for SimClient {
    fn is_jump_held(&self) -> bool {
        true
    }

    fn is_grounded(&self) -> bool {
        self.airborne_left == 0
    }

    fn issue_jump(&mut self) {
        self.issued += 1;
        let accepted = self.grounded_for >= self.server().landing_ticks
            && self.rng.random_range(0..100u64) >= self.server().loss_pct;
        if accepted {
            self.landed += 1;
            self.airborne_left = AIRTIME_TICKS;
            self.y += 0.42;
        }
    }

    fn required_grounded_ticks_base(&self) -> u32 {
        base_grounded_ticks(self.server().latency_ms, self.server().latency_ms < 10)
    }

    fn vertical_position(&self) -> f64 {
        self.y
    }

    fn latency_ms(&self) -> i32 {
        self.server().latency_ms
    }

    fn destination_id(&self) -> &str {
        self.server().name
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

fn bar(v: f64) -> String {
    let filled = (v * 20.0).round().clamp(0.0, 20.0) as usize;
    format!("[{}{}] {:.2}", "█".repeat(filled), "░".repeat(20 - filled), v)
}

fn row(tick: u32, d: &Diagnostics) {
    println!(
        "  t={:<4} {:<12} pen={} req={} ok={:<3} rej={:<3} rate {}",
        tick,
        d.profile.name(),
        d.adaptive_penalty_ticks,
        d.required_grounded_ticks,
        d.confirmed,
        d.rejected,
        bar(d.smoothed_rejection_rate),
    );
}

fn play(session: &mut Session<SimClient>, server: usize, ticks: u32) {
    session.input_mut().connect(server);
    println!(
        "▶  {} ({} ms, {}% loss)\n",
        SERVERS[server].name, SERVERS[server].latency_ms, SERVERS[server].loss_pct
    );

    let mut last_profile: Option<Profile> = None;
    for t in 1..=ticks {
        session.input_mut().advance();
        session.tick();
        let d = session.diagnostics();
        if last_profile.is_some_and(|p| p != d.profile) {
            println!("  t={:<4} ── switched to {} (cooldown {})", t, d.profile, session.cooldown_remaining());
        }
        last_profile = Some(d.profile);
        if t % 100 == 0 {
            row(t, &d);
        }
    }

    let input = session.input();
    println!(
        "\n  client: {} jumps issued, {} landed ({:.0}%)\n",
        input.issued,
        input.landed,
        100.0 * f64::from(input.landed) / f64::from(input.issued.max(1)),
    );
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  Adaptive Jump Timing: three servers, one player                     ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let mut session = Session::new(SimClient::new());
    session.set_toggle_feedback(|enabled| println!("  [feedback] jump timing {}", if enabled { "on" } else { "off" }));
    session.init();

    for server in 0..SERVERS.len() {
        play(&mut session, server, 600);
    }

    println!("▶  Remembered profiles\n");
    for (id, profile) in session.profile_memory().iter() {
        let stats = session.destination_stats(id);
        println!(
            "  {:<18} {:<12} attempts={:<4} rate {}",
            id,
            profile.name(),
            stats.map_or(0, |s| s.attempts()),
            bar(stats.map_or(0.0, |s| s.smoothed_rejection_rate())),
        );
    }
    println!();

    // Reconnecting recalls the remembered profile immediately.
    play(&mut session, 0, 100);

    session.toggle_enabled();
    session.toggle_enabled();
    println!("\n  {}", session.diagnostics());
}
