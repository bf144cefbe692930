//! Snap-load estimate for each shock cord.
//!
//! The cord is an ideal linear spring struck at the vehicle's speed at
//! deployment, with canopy and vehicle coupled through their reduced mass.
//! Real canopies inflate over time, so this overestimates the peak.

use log::{info, warn};

use super::parachute::Parachute;
use crate::constants::{LBF_TO_NEWTONS, ULTIMATE_TENSILE_STRAIN};
use crate::trajectory_system::trajectory::Trajectory;

pub struct ShockLoadEstimator {
    pub dry_mass: f64,
}

impl ShockLoadEstimator {
    pub fn new(dry_mass: f64) -> Self {
        ShockLoadEstimator { dry_mass }
    }

    /// Effective cord stiffness in N/m.
    pub fn cord_stiffness(parachute: &Parachute) -> f64 {
        (parachute.rated_load_lbf * LBF_TO_NEWTONS)
            / (parachute.shock_cord_length * ULTIMATE_TENSILE_STRAIN)
    }

    pub fn reduced_mass(&self, parachute: &Parachute) -> f64 {
        parachute.canopy_mass * self.dry_mass / (parachute.canopy_mass + self.dry_mass)
    }

    pub fn peak_opening_force(&self, parachute: &Parachute, deployment_speed: f64) -> f64 {
        deployment_speed * (Self::cord_stiffness(parachute) * self.reduced_mass(parachute)).sqrt()
    }

    /// Writes `peak_shock_force` on every stage that opened during the descent.
    pub fn annotate(&self, trajectory: &Trajectory, parachutes: &mut [Parachute]) {
        for parachute in parachutes.iter_mut() {
            let span = match parachute.span(trajectory.time_step, trajectory.len()) {
                Ok(span) => span,
                Err(e) => {
                    warn!("No shock estimate: {}", e);
                    parachute.peak_shock_force = None;
                    continue;
                }
            };

            let speed = trajectory
                .get(span.deploy_index)
                .map_or(0.0, |sample| sample.velocity.magnitude());
            let force = self.peak_opening_force(parachute, speed);
            info!("{} shock force: {:.2} N", parachute.name, force);
            parachute.peak_shock_force = Some(force);
        }
    }
}
