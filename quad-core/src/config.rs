use crate::error::ConfigError;
use crate::types::Depth;

/// Smallest accepted target node count.
pub const MIN_TARGET_COUNT: usize = 4;
/// Largest accepted target node count.
pub const MAX_TARGET_COUNT: usize = 40_000_000;
pub const DEFAULT_MAX_DEPTH: Depth = 20;

/// Parameters for a single generation run.
///
/// ### Fields
/// - `max_depth` - No node is created deeper than this.
/// - `target_count` - Growth stops once the tree has at least this many
///   nodes, or earlier if every leaf has reached `max_depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub max_depth: Depth,
    pub target_count: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            target_count: MIN_TARGET_COUNT,
        }
    }
}

impl GeneratorConfig {
    pub fn with_target(target_count: usize) -> Self {
        Self {
            target_count,
            ..Self::default()
        }
    }
}

/// Checks that `count` lies in `MIN_TARGET_COUNT..=MAX_TARGET_COUNT`.
pub fn validate_target_count(count: i64) -> Result<usize, ConfigError> {
    match usize::try_from(count) {
        Ok(n) if (MIN_TARGET_COUNT..=MAX_TARGET_COUNT).contains(&n) => Ok(n),
        _ => Err(ConfigError::OutOfRange(count)),
    }
}

/// Parses and range-checks a target count typed by a user.
///
/// Surrounding whitespace is ignored.
pub fn parse_target_count(input: &str) -> Result<usize, ConfigError> {
    let trimmed = input.trim();
    let count: i64 = trimmed
        .parse()
        .map_err(|_| ConfigError::NotAnInteger(trimmed.to_owned()))?;
    validate_target_count(count)
}
