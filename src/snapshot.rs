//! Portable snapshot of a session's persistent state (requires the `serde` feature).
//!
//! A [`MemorySnapshot`] captures the [`RuntimeConfig`], every remembered
//! profile and every destination's statistics. The library defines the data
//! model only; hosts pick the encoding (JSON, bincode, …) through serde.
//!
//! Destination lists are stored from most to least recently used, and
//! [`MemorySnapshot::restore`] replays them so recency survives a round trip.
//!
//! # Example
//!
//! ```rust,ignore
//! use jumptune_core::snapshot::MemorySnapshot;
//!
//! let json = serde_json::to_string(&MemorySnapshot::from_session(&session))?;
//! // … next launch …
//! let snapshot: MemorySnapshot = serde_json::from_str(&json)?;
//! snapshot.restore(&mut session)?;
//! session.init();
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::config::RuntimeConfig;
use crate::input::InputSource;
use crate::profile::Profile;
use crate::session::Session;
use crate::stats::DestinationStats;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Failure to apply a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the snapshot.
        found: u16,
        /// Version this build reads.
        expected: u16,
    },
}

/// Serializable session memory.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct MemorySnapshot {
    /// Format version; [`SNAPSHOT_VERSION`] for new snapshots.
    pub version: u16,
    /// Flags and thresholds.
    pub config: RuntimeConfig,
    /// Remembered profiles, most recent first.
    pub profiles: Vec<ProfileRecord>,
    /// Destination statistics, most recent first.
    pub stats: Vec<StatsRecord>,
}

/// One remembered destination profile.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ProfileRecord {
    /// Normalized destination id.
    pub destination_id: String,
    /// Profile remembered for it.
    pub profile: Profile,
}

/// One destination's statistics.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct StatsRecord {
    /// Normalized destination id.
    pub destination_id: String,
    /// Confirmed attempts.
    pub confirmed: u64,
    /// Rejected attempts.
    pub rejected: u64,
    /// Shadow predictions.
    pub shadow_predictions: u64,
    /// Smoothed rejection rate.
    pub smoothed_rejection_rate: f64,
}

impl From<(&str, &DestinationStats)> for StatsRecord {
    fn from((id, s): (&str, &DestinationStats)) -> Self {
        Self {
            destination_id: id.to_string(),
            confirmed: s.confirmed(),
            rejected: s.rejected(),
            shadow_predictions: s.shadow_predictions(),
            smoothed_rejection_rate: s.smoothed_rejection_rate(),
        }
    }
}

impl From<&StatsRecord> for DestinationStats {
    fn from(r: &StatsRecord) -> Self {
        DestinationStats::from_parts(
            r.confirmed,
            r.rejected,
            r.shadow_predictions,
            r.smoothed_rejection_rate,
        )
    }
}

impl MemorySnapshot {
    /// Capture the persistent state of `session`.
    pub fn from_session<I: InputSource>(session: &Session<I>) -> Self {
        let profiles = session
            .profile_memory()
            .iter()
            .map(|(id, &profile)| ProfileRecord {
                destination_id: id.to_string(),
                profile,
            })
            .collect();
        let stats = session.stats_memory().iter().map(StatsRecord::from).collect();

        Self {
            version: SNAPSHOT_VERSION,
            config: session.config().clone(),
            profiles,
            stats,
        }
    }

    /// Apply this snapshot to `session`: replace its configuration and merge
    /// the destination memories, keeping the stored recency order.
    ///
    /// Entries beyond the memory capacity are dropped oldest first.
    pub fn restore<I: InputSource>(&self, session: &mut Session<I>) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        session.replace_config(self.config.clone());
        session.restore_profiles(
            self.profiles
                .iter()
                .rev()
                .map(|r| (r.destination_id.as_str(), r.profile)),
        );
        session.restore_stats(
            self.stats
                .iter()
                .rev()
                .map(|r| (r.destination_id.as_str(), DestinationStats::from(r))),
        );
        Ok(())
    }

    /// Profile stored for `destination_id`, if any.
    pub fn find_profile(&self, destination_id: &str) -> Option<Profile> {
        self.profiles
            .iter()
            .find(|r| r.destination_id == destination_id)
            .map(|r| r.profile)
    }
}
