use thiserror::Error;

/// Errors from configuring the kinetics simulator.
#[derive(Debug, Error)]
pub enum KineticsError {
    #[error("temperature must be a positive finite number of kelvin, got {0}")]
    InvalidTemperature(f64),

    #[error("invalid reaction template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("unknown reaction template '{0}'")]
    UnknownTemplate(String),

    #[error("simulation box must have positive size, got {width} x {height}")]
    InvalidBounds { width: f64, height: f64 },

    #[error("contact distance must be a positive finite number, got {0}")]
    InvalidContactDistance(f64),

    #[error("invalid kinetics configuration: {0}")]
    Config(#[from] toml::de::Error),
}
