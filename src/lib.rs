pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;
pub mod wind_system;

pub use config::{BodyConfig, LaunchSite, ParachuteConfig, SimulationConfig};
pub use constants::*;
pub use control::deployment::DeploymentSequence;
pub use control::environment::{air_density, Environment};
pub use control::mission::Mission;
pub use control::parachute::{Parachute, ParachuteState, StageSpan};
pub use control::shock_load::ShockLoadEstimator;
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::integrator::{DescentOutcome, SimulationState, TrajectoryIntegrator};
pub use trajectory_system::trajectory::{Trajectory, TrajectorySample};

// Re-export commonly used items from wind_system
pub use wind_system::drift::WindDriftCorrector;
pub use wind_system::provider::{
    DescentProfileRequest, TawhiriClient, WindProfileProvider, WindSample, WindServiceError,
};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::Telemetry;

// Re-export commonly used utilities
pub use utils::vector3d::Vector3D;
