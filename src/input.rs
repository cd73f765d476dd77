//! Host capability boundary: the only way the core observes or affects the game.
//!
//! # Implementing for a new host
//!
//! ```rust,ignore
//! use jumptune_core::input::InputSource;
//!
//! struct MyClient { /* handle to the host's player, options and network */ }
//!
//! impl InputSource for MyClient {
//!     fn is_jump_held(&self) -> bool { self.options().jump_key_down() }
//!     fn is_grounded(&self) -> bool { self.player().on_ground() }
//!     fn issue_jump(&mut self) { self.player_mut().jump() }
//!     fn vertical_position(&self) -> f64 { self.player().y() }
//!     fn latency_ms(&self) -> i32 { self.network().ping_ms().unwrap_or(-1) }
//!     fn destination_id(&self) -> &str { self.server_address() }
//! }
//! // Now Session::<MyClient>::init(client) drives the full adaptive loop.
//! ```
//!
//! Every read is best-effort telemetry. Hosts report "unknown" with
//! `f64::NAN` for position and a negative latency; the core degrades to
//! conservative behaviour instead of failing.

/// Destination reported when the host cannot name one.
pub const DEFAULT_DESTINATION_ID: &str = "global";

/// Capability set supplied by the host platform.
///
/// Only [`is_jump_held`](InputSource::is_jump_held),
/// [`is_grounded`](InputSource::is_grounded) and
/// [`issue_jump`](InputSource::issue_jump) are required. The remaining
/// methods default to "unknown" values.
pub trait InputSource {
    /// `true` while the jump key is held.
    fn is_jump_held(&self) -> bool;

    /// `true` while the controlled player touches the ground.
    fn is_grounded(&self) -> bool;

    /// Perform the jump action on the local player.
    fn issue_jump(&mut self);

    /// Platform-estimated baseline of grounded ticks required before a jump.
    ///
    /// May vary with measured latency; see [`crate::latency`] for the
    /// reference mapping.
    fn required_grounded_ticks_base(&self) -> u32 {
        1
    }

    /// Current vertical position, or `f64::NAN` when unavailable.
    fn vertical_position(&self) -> f64 {
        f64::NAN
    }

    /// Measured round-trip latency in milliseconds; negative when unknown.
    fn latency_ms(&self) -> i32 {
        -1
    }

    /// Identifier of the connection target, before normalization.
    fn destination_id(&self) -> &str {
        DEFAULT_DESTINATION_ID
    }
}

/// Input that never holds jump and is never grounded.
///
/// Useful as a placeholder before the host wires a real input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoOpInput;

impl InputSource for NoOpInput {
    fn is_jump_held(&self) -> bool {
        false
    }

    fn is_grounded(&self) -> bool {
        false
    }

    fn issue_jump(&mut self) {}
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn is_jump_held(&self) -> bool {
        (**self).is_jump_held()
    }

    fn is_grounded(&self) -> bool {
        (**self).is_grounded()
    }

    fn issue_jump(&mut self) {
        (**self).issue_jump()
    }

    fn required_grounded_ticks_base(&self) -> u32 {
        (**self).required_grounded_ticks_base()
    }

    fn vertical_position(&self) -> f64 {
        (**self).vertical_position()
    }

    fn latency_ms(&self) -> i32 {
        (**self).latency_ms()
    }

    fn destination_id(&self) -> &str {
        (**self).destination_id()
    }
}

/// Normalize a raw destination identifier: trim, lowercase, and map blank
/// input to [`DEFAULT_DESTINATION_ID`].
pub fn normalize_destination_id(raw: &str) -> alloc::string::String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        alloc::string::String::from(DEFAULT_DESTINATION_ID)
    } else {
        trimmed.to_lowercase()
    }
}
