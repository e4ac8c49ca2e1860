//! Engine error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::surface::SurfaceError;

/// Errors that can occur during engine lifecycle.
///
/// No panics cross the worker/render boundary; every failure travels as a
/// value inspected on the render-owning context.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected at initialization.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The render surface failed while establishing initial state or
    /// applying a diff.
    #[error("render surface error: {0}")]
    Surface(#[from] SurfaceError),
}
