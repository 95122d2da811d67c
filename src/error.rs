use thiserror::Error;

use crate::atom::AtomId;
use crate::catalog::CatalogError;

/// Errors from the sandbox command surface. A resolution pass itself
/// never fails.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),

    #[error("no atom with id {0}")]
    AtomNotFound(AtomId),

    #[error("pressure must be a positive finite number of atmospheres, got {0}")]
    InvalidPressure(f64),

    #[error("temperature must be finite, got {0}")]
    InvalidTemperature(f64),

    #[error("position must be finite, got ({0}, {1})")]
    InvalidPosition(f64, f64),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
