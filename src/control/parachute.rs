use serde::Serialize;

use crate::config::ParachuteConfig;
use crate::errors::SimulationError;
use crate::trajectory_system::aerodynamics::Aerodynamics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParachuteState {
    Dormant,
    Opening,
    FullyOpen,
    Lost,
}

/// Sample indices bounding the part of the descent a stage was flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpan {
    pub deploy_index: usize,
    pub discard_index: usize,
}

impl StageSpan {
    pub fn len(&self) -> usize {
        self.discard_index.saturating_sub(self.deploy_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Parachute {
    pub name: String,
    pub deploy_altitude: f64,
    #[serde(skip)]
    pub canopy: Aerodynamics,
    pub canopy_mass: f64,
    pub rated_load_lbf: f64,
    pub shock_cord_length: f64,
    pub ramp_duration: f64,

    pub state: ParachuteState,
    pub open_fraction: f64,
    pub deploy_time: Option<f64>,
    pub discard_time: Option<f64>,
    pub force_history: Vec<f64>,
    pub peak_shock_force: Option<f64>,
}

impl Parachute {
    pub fn new(config: &ParachuteConfig) -> Self {
        Parachute {
            name: config.name.clone(),
            deploy_altitude: config.deploy_altitude,
            canopy: Aerodynamics::canopy(config.drag_coefficient, config.diameter),
            canopy_mass: config.canopy_mass,
            rated_load_lbf: config.rated_load_lbf,
            shock_cord_length: config.shock_cord_length,
            ramp_duration: config.ramp_duration,
            state: ParachuteState::Dormant,
            open_fraction: 0.0,
            deploy_time: None,
            discard_time: None,
            force_history: Vec::new(),
            peak_shock_force: None,
        }
    }

    pub fn deploy(&mut self, elapsed_time: f64) {
        if self.state == ParachuteState::Dormant {
            self.deploy_time = Some(elapsed_time);
            self.state = ParachuteState::Opening;
        }
    }

    /// Advances the linear opening ramp by one tick.
    pub fn inflate(&mut self, delta_time: f64) {
        if !matches!(self.state, ParachuteState::Opening) {
            return;
        }

        self.open_fraction = if self.ramp_duration > 0.0 {
            (self.open_fraction + delta_time / self.ramp_duration).min(1.0)
        } else {
            1.0
        };

        if self.open_fraction >= 1.0 {
            self.state = ParachuteState::FullyOpen;
        }
    }

    /// Cuts the stage away. Lost is terminal: a second call is a no-op.
    pub fn discard(&mut self, elapsed_time: f64) {
        if self.is_lost() {
            return;
        }
        self.state = ParachuteState::Lost;
        self.open_fraction = 0.0;
        self.discard_time = Some(elapsed_time);
    }

    /// Records the touchdown time on the stage still carrying the vehicle.
    pub fn land(&mut self, landing_time: f64) {
        if self.is_deployed() && !self.is_lost() && self.discard_time.is_none() {
            self.discard_time = Some(landing_time);
        }
    }

    pub fn calculate_drag_magnitude(&self, speed: f64, air_density: f64) -> f64 {
        self.open_fraction * self.canopy.calculate_drag_magnitude(speed, air_density)
    }

    pub fn record_force(&mut self, drag: f64) {
        self.force_history.push(drag);
    }

    pub fn is_deployed(&self) -> bool {
        self.deploy_time.is_some()
    }

    pub fn is_lost(&self) -> bool {
        self.state == ParachuteState::Lost
    }

    pub fn is_triggered(&self, altitude: f64) -> bool {
        altitude <= self.deploy_altitude
            && matches!(self.state, ParachuteState::Dormant | ParachuteState::Opening)
    }

    /// Resolves deploy/discard times to trajectory sample indices.
    ///
    /// A stage that never deployed yields `StageNeverOpened`, which callers
    /// treat as a warning and skip the stage.
    pub fn span(&self, delta_time: f64, sample_count: usize) -> Result<StageSpan, SimulationError> {
        let never_opened = || SimulationError::StageNeverOpened {
            name: self.name.clone(),
        };
        let deploy_time = self.deploy_time.ok_or_else(never_opened)?;
        let deploy_index = time_to_index(deploy_time, delta_time);
        if deploy_index >= sample_count {
            return Err(never_opened());
        }

        let last_index = sample_count - 1;
        let discard_index = self
            .discard_time
            .map_or(last_index, |time| time_to_index(time, delta_time))
            .min(last_index);

        Ok(StageSpan {
            deploy_index,
            discard_index: discard_index.max(deploy_index),
        })
    }
}

fn time_to_index(time: f64, delta_time: f64) -> usize {
    (time / delta_time).round().max(0.0) as usize
}
