use log::{debug, info};
use serde::Serialize;

use super::aerodynamics::Aerodynamics;
use super::kinematics::Kinematics;
use super::trajectory::{Trajectory, TrajectoryArrays, TrajectorySample};
use crate::config::SimulationConfig;
use crate::constants::GRAVITY;
use crate::control::deployment::DeploymentSequence;
use crate::control::environment::air_density;
use crate::control::parachute::Parachute;
use crate::utils::vector3d::Vector3D;

/// Vehicle state threaded through the integration loop.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub kinematics: Kinematics,
    pub trajectory: Trajectory,
}

impl SimulationState {
    fn new(config: &SimulationConfig) -> Self {
        let kinematics = Kinematics::new(config.initial_altitude, config.initial_velocity.into());
        let mut trajectory = Trajectory::for_descent(config.time_step, config.initial_altitude);
        trajectory.push(TrajectorySample {
            position: kinematics.position,
            velocity: kinematics.velocity,
            acceleration: kinematics.acceleration,
        });
        SimulationState {
            kinematics,
            trajectory,
        }
    }

    fn record(&mut self) {
        self.trajectory.push(TrajectorySample {
            position: self.kinematics.position,
            velocity: self.kinematics.velocity,
            acceleration: self.kinematics.acceleration,
        });
    }
}

/// Windless descent produced by one integration run.
#[derive(Debug, Clone)]
pub struct DescentOutcome {
    pub trajectory: Trajectory,
    pub parachutes: Vec<Parachute>,
    pub landing_time: f64,
}

#[derive(Serialize)]
struct DescentRecord<'a> {
    landing_time: f64,
    #[serde(flatten)]
    trajectory: TrajectoryArrays,
    parachutes: &'a [Parachute],
}

impl DescentOutcome {
    pub fn landing_sample(&self) -> Option<&TrajectorySample> {
        self.trajectory.last()
    }

    /// JSON document of `trajectory` plus every stage's timing, drag
    /// history and shock estimate.
    ///
    /// `trajectory` is normally the wind-corrected copy of this descent.
    pub fn to_json(&self, trajectory: &Trajectory) -> serde_json::Result<String> {
        serde_json::to_string(&DescentRecord {
            landing_time: self.landing_time,
            trajectory: trajectory.arrays(),
            parachutes: &self.parachutes,
        })
    }
}

/// Fixed-step explicit Euler integrator from apogee to touchdown.
///
/// The configuration is assumed validated; the loop only ends at ground
/// contact.
pub struct TrajectoryIntegrator {
    time_step: f64,
    dry_mass: f64,
    body: Aerodynamics,
    state: SimulationState,
    deployment: DeploymentSequence,
}

impl TrajectoryIntegrator {
    pub fn new(config: &SimulationConfig) -> Self {
        let mut parachutes: Vec<Parachute> = config.parachutes.iter().map(Parachute::new).collect();
        for parachute in parachutes.iter_mut() {
            // Zero drag at the initial sample keeps histories index-aligned.
            parachute.record_force(0.0);
        }

        TrajectoryIntegrator {
            time_step: config.time_step,
            dry_mass: config.dry_mass,
            body: Aerodynamics::cylinder(config.body.drag_coefficient, config.body.radius),
            state: SimulationState::new(config),
            deployment: DeploymentSequence::new(parachutes),
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn deployment(&self) -> &DeploymentSequence {
        &self.deployment
    }

    pub fn has_landed(&self) -> bool {
        self.state.kinematics.has_landed()
    }

    /// Advances the simulation by one tick and records the new sample.
    pub fn step(&mut self) {
        let kinematics = &self.state.kinematics;
        let altitude = kinematics.get_altitude();
        let elapsed_time = kinematics.get_time();
        let speed = kinematics.get_velocity_magnitude();
        let unit_velocity = kinematics.get_unit_velocity();
        let velocity = kinematics.velocity;
        let rho = air_density(altitude);

        let gravity = Vector3D::new(0.0, 0.0, -self.dry_mass * GRAVITY);

        self.deployment.update(altitude, elapsed_time, self.time_step);
        let parachute_drag = -unit_velocity * self.deployment.record_drag(speed, rho);

        let body_drag = self.body.calculate_drag(velocity, rho);

        let net_force: Vector3D = [gravity, parachute_drag, body_drag].into_iter().sum();
        self.state
            .kinematics
            .update(self.time_step, net_force, self.dry_mass);
        self.state.record();
    }

    /// Integrates until ground contact and closes out stage timing.
    pub fn run(mut self) -> DescentOutcome {
        info!(
            "Simulation initialised at {:.1} m with dt = {} s",
            self.state.kinematics.get_altitude(),
            self.time_step
        );

        while !self.has_landed() {
            self.step();

            if self.state.trajectory.len() % 2000 == 0 {
                debug!(
                    "t={:.1}s | Alt: {:.1}m | Vel: {:.2}m/s | Canopy: {}",
                    self.state.kinematics.get_time(),
                    self.state.kinematics.get_altitude(),
                    self.state.kinematics.velocity.z,
                    self.deployment
                        .active_parachute()
                        .map_or("none", |parachute| parachute.name.as_str())
                );
            }
        }

        let landing_time = self.state.kinematics.get_time();
        self.deployment.land(landing_time);
        info!(
            "Touchdown after {:.2} s at {:.2} m/s",
            landing_time,
            self.state.kinematics.get_velocity_magnitude()
        );

        DescentOutcome {
            trajectory: self.state.trajectory,
            parachutes: self.deployment.into_parachutes(),
            landing_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BodyConfig, ParachuteConfig};
    use approx::assert_relative_eq;

    fn drag_free_config(initial_velocity: [f64; 3]) -> SimulationConfig {
        let mut drogue = ParachuteConfig::new("Drogue", 15_000.0, 0.9, 0.21);
        drogue.drag_coefficient = 0.0;
        SimulationConfig {
            initial_altitude: 1_000.0,
            time_step: 0.01,
            initial_velocity,
            body: BodyConfig {
                drag_coefficient: 0.0,
                radius: 0.178,
            },
            parachutes: vec![drogue],
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_free_fall_matches_closed_form() {
        let v0 = 15.0;
        let mut integrator = TrajectoryIntegrator::new(&drag_free_config([0.0, 0.0, v0]));

        for _ in 0..500 {
            integrator.step();
        }

        let kinematics = &integrator.state().kinematics;
        let t = kinematics.get_time();
        assert_relative_eq!(t, 5.0, epsilon = 1e-9);
        assert_relative_eq!(kinematics.velocity.z, v0 - GRAVITY * t, epsilon = 1e-9);

        // Position carries an O(dt) truncation error.
        let exact = 1_000.0 + v0 * t - 0.5 * GRAVITY * t * t;
        let dt = 0.01;
        assert!((kinematics.get_altitude() - exact).abs() <= GRAVITY * t * dt);
    }

    #[test]
    fn test_trajectory_has_one_sample_per_tick() {
        let outcome = TrajectoryIntegrator::new(&drag_free_config([0.0, 0.0, 0.0])).run();

        let ticks = (outcome.landing_time / 0.01).round() as usize;
        assert_eq!(outcome.trajectory.len(), ticks + 1);
        for parachute in &outcome.parachutes {
            assert_eq!(parachute.force_history.len(), outcome.trajectory.len());
        }
        assert!(outcome.landing_sample().unwrap().position.z <= 0.0);
        assert!(outcome.trajectory.altitude_at(ticks - 1).unwrap() > 0.0);
    }

    #[test]
    fn test_first_tick_from_rest_has_no_drag() {
        let config = SimulationConfig {
            initial_altitude: 1_000.0,
            ..SimulationConfig::default()
        };
        let mut integrator = TrajectoryIntegrator::new(&config);
        integrator.step();

        let sample = integrator.state().trajectory.last().unwrap();
        assert_relative_eq!(sample.acceleration.z, -GRAVITY, epsilon = 1e-12);
        assert_eq!(sample.acceleration.x, 0.0);
    }

    #[test]
    fn test_drag_slows_descent() {
        let config = SimulationConfig {
            initial_altitude: 3_000.0,
            parachutes: vec![ParachuteConfig::new("Main", 3_000.0, 4.86, 1.7)],
            ..SimulationConfig::default()
        };
        let outcome = TrajectoryIntegrator::new(&config).run();

        let landing = outcome.landing_sample().unwrap();
        assert!(landing.velocity.z < 0.0);
        assert!(
            landing.velocity.z.abs() < 9.0,
            "landing speed too high: {}",
            landing.velocity.z
        );
    }

    #[test]
    fn test_open_fraction_stays_bounded() {
        let config = SimulationConfig {
            initial_altitude: 2_500.0,
            time_step: 0.1,
            parachutes: vec![
                ParachuteConfig::new("Drogue", 2_500.0, 0.9, 0.21),
                ParachuteConfig::new("Main", 1_000.0, 4.86, 1.7),
            ],
            ..SimulationConfig::default()
        };
        let mut integrator = TrajectoryIntegrator::new(&config);

        while !integrator.has_landed() {
            integrator.step();
            for parachute in &integrator.deployment().parachutes {
                assert!((0.0..=1.0).contains(&parachute.open_fraction));
                if parachute.is_lost() {
                    assert_eq!(parachute.open_fraction, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_json_record_includes_stage_history() {
        let config = SimulationConfig {
            initial_altitude: 1_200.0,
            parachutes: vec![
                ParachuteConfig::new("Drogue", 1_200.0, 0.9, 0.21),
                ParachuteConfig::new("Main", 500.0, 4.86, 1.7),
            ],
            ..SimulationConfig::default()
        };
        let outcome = TrajectoryIntegrator::new(&config).run();

        let json: serde_json::Value =
            serde_json::from_str(&outcome.to_json(&outcome.trajectory).unwrap()).unwrap();

        let samples = outcome.trajectory.len();
        assert_eq!(json["positions"].as_array().unwrap().len(), samples);
        assert_eq!(json["landing_time"], outcome.landing_time);

        let drogue = &json["parachutes"][0];
        assert_eq!(drogue["name"], "Drogue");
        assert_eq!(drogue["state"], "Lost");
        assert_eq!(drogue["deploy_time"], 0.0);
        assert_eq!(drogue["force_history"].as_array().unwrap().len(), samples);
        assert!(drogue.get("canopy").is_none());

        let main = &json["parachutes"][1];
        assert_eq!(main["state"], "FullyOpen");
        assert_eq!(main["discard_time"], outcome.landing_time);
        assert!(main["peak_shock_force"].is_null());
    }
}
