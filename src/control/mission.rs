use chrono::{DateTime, Utc};
use log::info;

use super::shock_load::ShockLoadEstimator;
use crate::config::{LaunchSite, SimulationConfig};
use crate::errors::SimulationError;
use crate::trajectory_system::integrator::{DescentOutcome, TrajectoryIntegrator};
use crate::trajectory_system::trajectory::Trajectory;
use crate::wind_system::drift::WindDriftCorrector;
use crate::wind_system::provider::WindProfileProvider;

/// A validated descent scenario.
#[derive(Debug, Clone)]
pub struct Mission {
    config: SimulationConfig,
}

impl Mission {
    /// Validates `config`; nothing is simulated for an invalid scenario.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Ok(Mission {
            config: config.validate()?,
        })
    }

    pub fn launch_site(&self) -> LaunchSite {
        self.config.resolved_launch_site()
    }

    /// Integrates the windless descent and annotates shock loads.
    pub fn simulate(&self) -> DescentOutcome {
        let mut outcome = TrajectoryIntegrator::new(&self.config).run();
        ShockLoadEstimator::new(self.config.dry_mass)
            .annotate(&outcome.trajectory, &mut outcome.parachutes);
        outcome
    }

    /// Applies wind drift to a finished descent.
    ///
    /// On failure the windless trajectory in `outcome` is untouched.
    pub fn correct_for_wind<P: WindProfileProvider>(
        &self,
        outcome: &DescentOutcome,
        provider: &P,
        launch_time: DateTime<Utc>,
    ) -> Result<Trajectory, SimulationError> {
        info!("Simulation finished, adding wind");
        WindDriftCorrector::new(provider, self.launch_site(), launch_time)
            .correct(&outcome.trajectory, &outcome.parachutes)
    }
}
