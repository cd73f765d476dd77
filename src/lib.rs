//! # jumptune-core
//!
//! Adaptive jump timing: latency-compensated jump gating with per-destination
//! auto-tuning.
//!
//! ---
//!
//! ## The problem
//!
//! Holding jump in a networked game fires the jump on the first grounded
//! client tick. Under latency the server may not yet agree that the player has
//! landed, and silently drops the jump. This crate holds the jump until the
//! player has been grounded long enough, infers from the vertical position
//! whether the server executed it, and adapts:
//!
//! **Adaptive penalty**: every inferred rejection adds a tick of delay, up to a
//! profile ceiling; a streak of confirmations takes one away again.
//!
//! **Per-destination memory**: every server keeps its own smoothed rejection
//! rate and remembered profile. A lossy server never taints a clean one.
//!
//! **Auto-switching**: once a destination has enough attempts, its latency and
//! rejection rate pick the profile, with a cooldown against flapping.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! InputSource → JumpController → counters ─┐
//!      │                                   ▼
//!  destination id ──────────► Session → DestinationStats (EMA)
//!                                 │            │
//!                           LruMemory     choose_profile
//!                          (128 dests)    + SwitchCooldown
//!                                 │            │
//!                                 └── Profile ◄┘
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`profile`] | [`Profile`] | Three tuning bundles and their cycle order |
//! | [`input`] | [`InputSource`], [`NoOpInput`] | Host capability boundary |
//! | [`latency`] | [`LatencyBand`] | Reference latency → base grounded ticks mapping |
//! | [`controller`] | [`JumpController`] | Per-tick gate and outcome inference |
//! | [`stats`] | [`DestinationStats`] | Outcome counts and smoothed rejection rate |
//! | [`memory`] | [`LruMemory`] | Bounded LRU arena keyed by destination |
//! | [`config`] | [`RuntimeConfig`] | Flags and ordered thresholds |
//! | [`policy`] | [`choose_profile`], [`SwitchCooldown`] | Auto-switch decision |
//! | [`diagnostics`] | [`Diagnostics`] | Overlay snapshot |
//! | [`session`] | [`Session`] | Lifecycle, destination tracking, user actions |
//! | `shared` | `SharedSession` | Lock-guarded handle (requires `std`) |
//! | `snapshot` | `MemorySnapshot` | Serde persistence model (requires `serde`) |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use jumptune_core::{InputSource, Session};
//!
//! let mut session = Session::new(my_client);
//! session.init();
//! // once per client tick:
//! session.tick();
//! println!("{}", session.diagnostics());
//! ```
//!
//! ## `no_std`
//!
//! Everything except `shared` builds on `no_std + alloc`. The `std` feature
//! (default) adds `SharedSession`; the `serde` feature adds derives and the
//! snapshot module. Logging goes through the `tracing` facade; install any
//! subscriber in the host.
//!
//! ## License
//!
//! Business Source License 1.1.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod input;
pub mod latency;
pub mod memory;
pub mod policy;
pub mod profile;
pub mod session;
pub mod stats;

#[cfg(feature = "std")]
pub mod shared;
#[cfg(feature = "serde")]
pub mod snapshot;

pub use config::RuntimeConfig;
pub use controller::{AttemptOutcome, AttemptState, JumpAction, JumpController, TickReport};
pub use diagnostics::Diagnostics;
pub use input::{InputSource, NoOpInput, DEFAULT_DESTINATION_ID};
pub use latency::LatencyBand;
pub use memory::{LruMemory, DESTINATION_CAPACITY};
pub use policy::{choose_profile, SwitchCooldown};
pub use profile::{ParseProfileError, Profile};
pub use session::Session;
pub use stats::DestinationStats;

#[cfg(feature = "std")]
pub use shared::SharedSession;
#[cfg(feature = "serde")]
pub use snapshot::{MemorySnapshot, SnapshotError};
