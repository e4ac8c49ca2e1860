//! Engine configuration.
//!
//! Configuration is a plain struct of constants, not a file format. The
//! defaults mirror the reference deployment: 500 candidate markers seeded
//! inside the Aalborg area, a 100 ms minimum reconciliation interval, and
//! the opacity-toggle strategy.

use std::time::Duration;

use thiserror::Error;

use crate::geo::GeoBounds;
use crate::reconciler::StrategyKind;

/// Default number of candidate markers.
pub const DEFAULT_MARKER_COUNT: usize = 500;

/// Default minimum interval between accepted reconciliations.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Seed bounds of the reference deployment (the Aalborg area).
pub fn default_seed_bounds() -> GeoBounds {
    GeoBounds::new(
        57.019143450790736,
        57.07330227940989,
        9.870788205125782,
        9.979964838523783,
    )
}

/// Configuration errors, all fatal at initialization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The south-west corner must be strictly south and west of the
    /// north-east corner.
    #[error("invalid seed bounds: south-west corner must lie strictly south and west of north-east")]
    InvalidBounds,

    /// At least one candidate marker is required.
    #[error("marker count must be greater than zero")]
    InvalidMarkerCount,
}

/// Top-level engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of candidate markers to seed.
    pub marker_count: usize,

    /// Geographic rectangle candidate positions are generated within.
    pub seed_bounds: GeoBounds,

    /// Minimum interval between accepted reconciliations.
    pub min_interval: Duration,

    /// Which reconciliation strategy to run with.
    pub strategy: StrategyKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            marker_count: DEFAULT_MARKER_COUNT,
            seed_bounds: default_seed_bounds(),
            min_interval: DEFAULT_MIN_INTERVAL,
            strategy: StrategyKind::OpacityToggle,
        }
    }
}

impl EngineConfig {
    /// Set the candidate marker count.
    pub fn with_marker_count(mut self, count: usize) -> Self {
        self.marker_count = count;
        self
    }

    /// Set the seed bounds.
    pub fn with_seed_bounds(mut self, bounds: GeoBounds) -> Self {
        self.seed_bounds = bounds;
        self
    }

    /// Set the minimum reconciliation interval.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Set the reconciliation strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Validate the configuration; rejected configurations create no
    /// partial state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed_bounds.min_lat >= self.seed_bounds.max_lat
            || self.seed_bounds.min_lon >= self.seed_bounds.max_lon
        {
            return Err(ConfigError::InvalidBounds);
        }
        if self.marker_count == 0 {
            return Err(ConfigError::InvalidMarkerCount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.marker_count, 500);
        assert_eq!(config.min_interval, Duration::from_millis(100));
        assert_eq!(config.strategy, StrategyKind::OpacityToggle);
    }

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::default()
            .with_marker_count(42)
            .with_min_interval(Duration::from_millis(250))
            .with_strategy(StrategyKind::Materialize);

        assert_eq!(config.marker_count, 42);
        assert_eq!(config.min_interval, Duration::from_millis(250));
        assert_eq!(config.strategy, StrategyKind::Materialize);
    }

    #[test]
    fn test_zero_marker_count_is_rejected() {
        let config = EngineConfig::default().with_marker_count(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidMarkerCount));
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let inverted_lat = EngineConfig::default()
            .with_seed_bounds(GeoBounds::new(57.1, 57.0, 9.8, 9.9));
        assert_eq!(inverted_lat.validate(), Err(ConfigError::InvalidBounds));

        let inverted_lon = EngineConfig::default()
            .with_seed_bounds(GeoBounds::new(57.0, 57.1, 9.9, 9.8));
        assert_eq!(inverted_lon.validate(), Err(ConfigError::InvalidBounds));
    }

    #[test]
    fn test_degenerate_bounds_are_rejected() {
        // A zero-area rectangle cannot seed distinct positions.
        let config =
            EngineConfig::default().with_seed_bounds(GeoBounds::new(57.0, 57.0, 9.8, 9.8));
        assert_eq!(config.validate(), Err(ConfigError::InvalidBounds));
    }
}
