//! Simulation configuration and fail-fast validation.
//!
//! Configuration can be built in code or loaded from a TOML file; every
//! field is optional and falls back to the default descent profile.

use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LaunchSite {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LaunchSite {
    fn default() -> Self {
        LaunchSite {
            latitude: DEFAULT_LAUNCH_LATITUDE,
            longitude: DEFAULT_LAUNCH_LONGITUDE,
        }
    }
}

impl LaunchSite {
    /// Rejects latitudes outside [-90, 90] and wraps longitude into [0, 360).
    pub fn validate(self) -> Result<LaunchSite, SimulationError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SimulationError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "longitude must be finite, got {}",
                self.longitude
            )));
        }
        Ok(LaunchSite {
            latitude: self.latitude,
            longitude: self.longitude.rem_euclid(360.0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub drag_coefficient: f64,
    pub radius: f64,
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig {
            drag_coefficient: BODY_DRAG_COEFFICIENT,
            radius: BODY_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParachuteConfig {
    pub name: String,
    pub deploy_altitude: f64,
    pub diameter: f64,
    pub canopy_mass: f64,
    #[serde(default = "default_parachute_drag_coefficient")]
    pub drag_coefficient: f64,
    #[serde(default = "default_rated_load")]
    pub rated_load_lbf: f64,
    #[serde(default = "default_shock_cord_length")]
    pub shock_cord_length: f64,
    #[serde(default = "default_ramp_duration")]
    pub ramp_duration: f64,
}

fn default_parachute_drag_coefficient() -> f64 {
    PARACHUTE_DRAG_COEFFICIENT
}

fn default_rated_load() -> f64 {
    PARACHUTE_RATED_LOAD_LBF
}

fn default_shock_cord_length() -> f64 {
    SHOCK_CORD_LENGTH
}

fn default_ramp_duration() -> f64 {
    PARACHUTE_RAMP_DURATION
}

impl ParachuteConfig {
    pub fn new(name: &str, deploy_altitude: f64, diameter: f64, canopy_mass: f64) -> Self {
        ParachuteConfig {
            name: name.to_string(),
            deploy_altitude,
            diameter,
            canopy_mass,
            drag_coefficient: PARACHUTE_DRAG_COEFFICIENT,
            rated_load_lbf: PARACHUTE_RATED_LOAD_LBF,
            shock_cord_length: SHOCK_CORD_LENGTH,
            ramp_duration: PARACHUTE_RAMP_DURATION,
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |what: &str, value: f64| {
            Err(SimulationError::InvalidConfiguration(format!(
                "parachute '{}': {} must be positive, got {}",
                self.name, what, value
            )))
        };

        if !(self.diameter > 0.0) {
            return invalid("diameter", self.diameter);
        }
        if !(self.canopy_mass > 0.0) {
            return invalid("canopy mass", self.canopy_mass);
        }
        if !(self.shock_cord_length > 0.0) {
            return invalid("shock cord length", self.shock_cord_length);
        }
        if !(self.drag_coefficient >= 0.0) || !(self.rated_load_lbf >= 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "parachute '{}': drag coefficient and rated load must be non-negative",
                self.name
            )));
        }
        if !(self.ramp_duration >= 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "parachute '{}': ramp duration must be non-negative, got {}",
                self.name, self.ramp_duration
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_altitude: f64,
    pub time_step: f64,
    pub dry_mass: f64,
    pub initial_velocity: [f64; 3],
    pub launch_site: Option<LaunchSite>,
    pub body: BodyConfig,
    pub parachutes: Vec<ParachuteConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_altitude: INITIAL_ALTITUDE,
            time_step: TIME_STEP,
            dry_mass: DRY_MASS,
            initial_velocity: [0.0, 0.0, 0.0],
            launch_site: None,
            body: BodyConfig::default(),
            parachutes: vec![
                ParachuteConfig::new("Drogue", 15_000.0, 0.9, 0.21),
                ParachuteConfig::new("Main", 2_000.0, 4.86, 1.7),
            ],
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, SimulationError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Launch site to use, falling back to the default site when unset.
    pub fn resolved_launch_site(&self) -> LaunchSite {
        self.launch_site.unwrap_or_default()
    }

    /// Checks every precondition of a run before any simulation work.
    ///
    /// Returns the configuration with its launch longitude normalized.
    pub fn validate(mut self) -> Result<Self, SimulationError> {
        if !(self.time_step > 0.0) || !self.time_step.is_finite() {
            return Err(SimulationError::InvalidTimeStep(self.time_step));
        }
        if let Some(site) = self.launch_site {
            self.launch_site = Some(site.validate()?);
        }
        if !(self.dry_mass > 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "dry mass must be positive, got {}",
                self.dry_mass
            )));
        }
        if !(self.initial_altitude > 0.0) || !self.initial_altitude.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "initial altitude must be positive, got {}",
                self.initial_altitude
            )));
        }
        if self.initial_velocity.iter().any(|component| !component.is_finite()) {
            return Err(SimulationError::InvalidConfiguration(
                "initial velocity must be finite".to_string(),
            ));
        }
        if !(self.body.drag_coefficient >= 0.0) || !(self.body.radius >= 0.0) {
            return Err(SimulationError::InvalidConfiguration(
                "body drag coefficient and radius must be non-negative".to_string(),
            ));
        }

        for parachute in &self.parachutes {
            parachute.validate()?;
        }
        for pair in self.parachutes.windows(2) {
            if pair[1].deploy_altitude >= pair[0].deploy_altitude {
                return Err(SimulationError::InvalidStageOrder {
                    name: pair[1].name.clone(),
                    altitude: pair[1].deploy_altitude,
                    previous: pair[0].deploy_altitude,
                });
            }
        }

        Ok(self)
    }
}
