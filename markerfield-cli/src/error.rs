//! CLI error types.

use std::fmt;

use markerfield::EngineError;

/// Errors that can occur while running the harness.
#[derive(Debug)]
pub enum CliError {
    /// The visibility engine failed to construct or apply a diff.
    Engine(EngineError),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "engine error: {}", e),
            CliError::RuntimeCreation(e) => write!(f, "failed to create Tokio runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Engine(e) => Some(e),
            CliError::RuntimeCreation(e) => Some(e),
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Engine(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markerfield::ConfigError;

    #[test]
    fn test_display_wraps_engine_error() {
        let err = CliError::from(EngineError::from(ConfigError::InvalidMarkerCount));
        assert!(err.to_string().contains("engine error"));
    }
}
