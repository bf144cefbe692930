use thiserror::Error;

use crate::wind_system::provider::WindServiceError;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Latitude out of bounds: {0} (expected -90..=90)")]
    InvalidLatitude(f64),

    #[error("Invalid time step: {0} s (must be positive)")]
    InvalidTimeStep(f64),

    #[error("Parachute '{name}' never opened before landing")]
    StageNeverOpened { name: String },

    #[error("Wind service failure: {0}")]
    WindServiceFailure(#[from] WindServiceError),

    #[error(
        "Parachute '{name}' deploys at {altitude} m, not below the previous stage at {previous} m"
    )]
    InvalidStageOrder {
        name: String,
        altitude: f64,
        previous: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
