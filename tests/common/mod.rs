//! Scripted [`InputSource`] shared by the integration tests.

#![allow(dead_code)]

use jumptune_core::InputSource;

/// Fully controllable input that records every issued jump.
///
/// With `rise_on_jump` set, each issued jump lifts the player by one block so
/// the next tick confirms it; otherwise the position stays flat and every
/// attempt is rejected after the timeout.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    pub grounded: bool,
    pub held: bool,
    pub base: u32,
    pub y: f64,
    pub latency: i32,
    pub destination: String,
    pub rise_on_jump: bool,
    pub jumps: u32,
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self {
            grounded: true,
            held: true,
            base: 1,
            y: 64.0,
            latency: 40,
            destination: String::from("alpha.example"),
            rise_on_jump: false,
            jumps: 0,
        }
    }
}

impl ScriptedInput {
    /// Held, grounded input whose jumps never land.
    pub fn rejecting() -> Self {
        Self::default()
    }

    /// Held, grounded input whose jumps always land.
    pub fn confirming() -> Self {
        Self {
            rise_on_jump: true,
            ..Self::default()
        }
    }

    pub fn at(mut self, destination: &str) -> Self {
        self.destination = String::from(destination);
        self
    }

    pub fn with_latency(mut self, latency: i32) -> Self {
        self.latency = latency;
        self
    }
}

impl InputSource for ScriptedInput {
    fn is_jump_held(&self) -> bool {
        self.held
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn issue_jump(&mut self) {
        self.jumps += 1;
        if self.rise_on_jump {
            self.y += 1.0;
        }
    }

    fn required_grounded_ticks_base(&self) -> u32 {
        self.base
    }

    fn vertical_position(&self) -> f64 {
        self.y
    }

    fn latency_ms(&self) -> i32 {
        self.latency
    }

    fn destination_id(&self) -> &str {
        &self.destination
    }
}
