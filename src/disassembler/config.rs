//! Disassembly configuration
//!
//! The disassembler has two knobs: what happens when two dictionaries define the same method
//! identifier, and how deep nested code may go before disassembly is abandoned.

use strum::{Display, EnumIter, EnumString};

/// Default limit on nested blocks (continuations, referenced cells, dictionary bodies).
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// What to do when a dictionary key targets an already registered method identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the earlier method and log a warning. The most recent definition wins.
    #[default]
    Overwrite,
    /// Fail with [`crate::Error::DuplicateMethod`]
    Reject,
}

/// Configuration for a disassembly run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisassemblerConfig {
    /// How method identifier collisions are handled (default: overwrite)
    pub collision: CollisionPolicy,

    /// Maximum number of nested blocks being disassembled at once, the entry block
    /// included (default: 512)
    pub max_depth: usize,
}

impl Default for DisassemblerConfig {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::Overwrite,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DisassemblerConfig {
    /// Creates a configuration that rejects method identifier collisions
    ///
    /// Useful when the output feeds tools that assume every dictionary key is unique
    /// across the whole program.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            collision: CollisionPolicy::Reject,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Returns a copy with a different depth limit
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns a copy with a different collision policy
    #[must_use]
    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_presets() {
        let config = DisassemblerConfig::default();
        assert_eq!(config.collision, CollisionPolicy::Overwrite);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);

        let strict = DisassemblerConfig::strict();
        assert_eq!(strict.collision, CollisionPolicy::Reject);
        assert_eq!(strict.with_max_depth(8).max_depth, 8);
        assert_eq!(
            strict.with_collision(CollisionPolicy::Overwrite),
            DisassemblerConfig::default()
        );
    }

    #[test]
    fn test_policy_names() {
        for policy in CollisionPolicy::iter() {
            assert_eq!(CollisionPolicy::from_str(&policy.to_string()).unwrap(), policy);
        }
        assert_eq!(CollisionPolicy::Reject.to_string(), "reject");
        assert!(CollisionPolicy::from_str("merge").is_err());
    }
}
