//! Jump timing profiles.
//!
//! A [`Profile`] is a named bundle of three tuning constants. The profile
//! decides how aggressive the base timing is and how quickly the adaptive
//! penalty grows and decays.
//!
//! | Profile | Grounded offset | Max penalty | Successes to decay |
//! |---------|-----------------|-------------|--------------------|
//! | `Competitive` | −1 | 1 | 5 |
//! | `Smart` | 0 | 3 | 3 |
//! | `Stable` | +1 | 5 | 2 |
//!
//! Profiles cycle `Competitive → Smart → Stable → Competitive`.

use core::fmt;
use core::str::FromStr;

/// Named jump timing profile.
///
/// Immutable: every constant is a function of the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Profile {
    /// Shortest delay, smallest penalty ceiling. For low-latency destinations.
    Competitive,
    /// Balanced default.
    #[default]
    Smart,
    /// Longest delay, fastest penalty decay. For lossy or distant destinations.
    Stable,
}

/// All profiles in cycle order.
pub const ALL_PROFILES: [Profile; 3] = [Profile::Competitive, Profile::Smart, Profile::Stable];

impl Profile {
    /// Adjustment applied to the collaborator's base grounded-tick requirement.
    pub const fn grounded_ticks_offset(self) -> i32 {
        match self {
            Profile::Competitive => -1,
            Profile::Smart => 0,
            Profile::Stable => 1,
        }
    }

    /// Ceiling for the adaptive penalty, in ticks.
    pub const fn max_adaptive_penalty_ticks(self) -> u32 {
        match self {
            Profile::Competitive => 1,
            Profile::Smart => 3,
            Profile::Stable => 5,
        }
    }

    /// Consecutive confirmed jumps needed before the penalty decays by one tick.
    pub const fn successes_to_reduce_penalty(self) -> u32 {
        match self {
            Profile::Competitive => 5,
            Profile::Smart => 3,
            Profile::Stable => 2,
        }
    }

    /// The next profile in cycle order.
    pub const fn next(self) -> Profile {
        match self {
            Profile::Competitive => Profile::Smart,
            Profile::Smart => Profile::Stable,
            Profile::Stable => Profile::Competitive,
        }
    }

    /// Canonical upper-case name, as used in persisted memory.
    pub const fn name(self) -> &'static str {
        match self {
            Profile::Competitive => "COMPETITIVE",
            Profile::Smart => "SMART",
            Profile::Stable => "STABLE",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a [`Profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown jump profile name")]
pub struct ParseProfileError;

impl FromStr for Profile {
    type Err = ParseProfileError;

    /// Parse a profile name, ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ALL_PROFILES
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or(ParseProfileError)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_constants() {
        assert_eq!(Profile::Competitive.grounded_ticks_offset(), -1);
        assert_eq!(Profile::Smart.grounded_ticks_offset(), 0);
        assert_eq!(Profile::Stable.grounded_ticks_offset(), 1);

        assert_eq!(Profile::Competitive.max_adaptive_penalty_ticks(), 1);
        assert_eq!(Profile::Smart.max_adaptive_penalty_ticks(), 3);
        assert_eq!(Profile::Stable.max_adaptive_penalty_ticks(), 5);

        assert_eq!(Profile::Competitive.successes_to_reduce_penalty(), 5);
        assert_eq!(Profile::Smart.successes_to_reduce_penalty(), 3);
        assert_eq!(Profile::Stable.successes_to_reduce_penalty(), 2);
    }

    #[test]
    fn test_profile_cycle_wraps() {
        assert_eq!(Profile::Competitive.next(), Profile::Smart);
        assert_eq!(Profile::Smart.next(), Profile::Stable);
        assert_eq!(Profile::Stable.next(), Profile::Competitive);

        let mut p = Profile::Smart;
        for _ in 0..ALL_PROFILES.len() {
            p = p.next();
        }
        assert_eq!(p, Profile::Smart);
    }

    #[test]
    fn test_default_is_smart() {
        assert_eq!(Profile::default(), Profile::Smart);
    }

    #[test]
    fn test_parse_ignores_case_and_whitespace() {
        assert_eq!("competitive".parse::<Profile>(), Ok(Profile::Competitive));
        assert_eq!("  SMART ".parse::<Profile>(), Ok(Profile::Smart));
        assert_eq!("Stable".parse::<Profile>(), Ok(Profile::Stable));
        assert_eq!("turbo".parse::<Profile>(), Err(ParseProfileError));
        assert_eq!("".parse::<Profile>(), Err(ParseProfileError));
    }
}
