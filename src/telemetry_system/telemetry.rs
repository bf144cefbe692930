use std::fmt;

use crate::control::parachute::Parachute;
use crate::trajectory_system::integrator::DescentOutcome;
use crate::trajectory_system::trajectory::Trajectory;

#[derive(Debug, Clone, PartialEq)]
pub struct StageSummary {
    pub name: String,
    pub deploy_time: Option<f64>,
    pub discard_time: Option<f64>,
    pub peak_drag: f64,
    pub shock_force: Option<f64>,
}

impl StageSummary {
    fn from_parachute(parachute: &Parachute) -> Self {
        StageSummary {
            name: parachute.name.clone(),
            deploy_time: parachute.deploy_time,
            discard_time: parachute.discard_time,
            peak_drag: parachute
                .force_history
                .iter()
                .copied()
                .fold(0.0, f64::max),
            shock_force: parachute.peak_shock_force,
        }
    }
}

/// End-of-run summary of a descent.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub descent_time: f64,
    pub apogee: f64,
    pub landing_speed: f64,
    pub landing_distance: f64,
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub stages: Vec<StageSummary>,
}

impl Telemetry {
    /// Summarises `outcome`, measuring landing distance on `trajectory`.
    ///
    /// Pass the wind-corrected trajectory when one is available.
    pub fn new(outcome: &DescentOutcome, trajectory: &Trajectory) -> Self {
        let samples = trajectory.samples();
        let (landing_speed, landing_distance) = trajectory.last().map_or((0.0, 0.0), |last| {
            (-last.velocity.z, last.position.horizontal_magnitude())
        });

        Telemetry {
            descent_time: outcome.landing_time,
            apogee: trajectory.altitude_at(0).unwrap_or(0.0),
            landing_speed,
            landing_distance,
            max_velocity: samples
                .iter()
                .map(|s| s.velocity.magnitude())
                .fold(0.0, f64::max),
            max_acceleration: samples
                .iter()
                .map(|s| s.acceleration.magnitude())
                .fold(0.0, f64::max),
            stages: outcome.parachutes.iter().map(StageSummary::from_parachute).collect(),
        }
    }

    fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_altitude(altitude: f64) -> String {
        if altitude >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    fn format_event(time: Option<f64>) -> String {
        time.map_or_else(|| "never".to_string(), Self::format_time)
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--------------------")?;
        writeln!(f, "Apogee: {}", Self::format_altitude(self.apogee))?;
        writeln!(f, "Descent Time: {}", Self::format_time(self.descent_time))?;
        writeln!(f, "Landing Speed: {:.2} m/s", self.landing_speed)?;
        writeln!(f, "Landing Distance: {:.0} m", self.landing_distance)?;
        writeln!(f, "Max Velocity: {:.2} m/s", self.max_velocity)?;
        writeln!(f, "Max Acceleration: {:.2} m/s²", self.max_acceleration)?;
        for stage in &self.stages {
            writeln!(
                f,
                "{}: deployed {}, released {}, peak drag {:.2} N",
                stage.name,
                Self::format_event(stage.deploy_time),
                Self::format_event(stage.discard_time),
                stage.peak_drag
            )?;
            if let Some(force) = stage.shock_force {
                writeln!(f, "{} Shock Force: {:.2} N", stage.name, force)?;
            }
        }
        write!(f, "--------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParachuteConfig;
    use crate::trajectory_system::trajectory::TrajectorySample;
    use crate::utils::vector3d::Vector3D;

    fn create_test_outcome() -> DescentOutcome {
        let mut trajectory = Trajectory::new(1.0);
        trajectory.push(TrajectorySample {
            position: Vector3D::new(0.0, 0.0, 1_500.0),
            velocity: Vector3D::ZERO,
            acceleration: Vector3D::ZERO,
        });
        trajectory.push(TrajectorySample {
            position: Vector3D::new(30.0, 40.0, 0.0),
            velocity: Vector3D::new(0.0, 0.0, -5.5),
            acceleration: Vector3D::new(0.0, 0.0, 2.0),
        });

        let mut main = Parachute::new(&ParachuteConfig::new("Main", 2_000.0, 4.86, 1.7));
        main.deploy(0.0);
        main.land(1.0);
        main.force_history = vec![0.0, 480.0];
        main.peak_shock_force = Some(1234.5);

        DescentOutcome {
            trajectory,
            parachutes: vec![main],
            landing_time: 1.0,
        }
    }

    #[test]
    fn test_summary_metrics() {
        let outcome = create_test_outcome();
        let telemetry = Telemetry::new(&outcome, &outcome.trajectory);

        assert_eq!(telemetry.apogee, 1_500.0);
        assert_eq!(telemetry.landing_speed, 5.5);
        assert_eq!(telemetry.landing_distance, 50.0);
        assert_eq!(telemetry.max_velocity, 5.5);
        assert_eq!(telemetry.max_acceleration, 2.0);
        assert_eq!(telemetry.stages[0].peak_drag, 480.0);
    }

    #[test]
    fn test_display_lists_shock_forces() {
        let outcome = create_test_outcome();
        let report = Telemetry::new(&outcome, &outcome.trajectory).to_string();

        assert!(report.contains("Landing Speed: 5.50 m/s"));
        assert!(report.contains("Landing Distance: 50 m"));
        assert!(report.contains("Main Shock Force: 1234.50 N"));
        assert!(report.contains("Apogee: 1.50 km"));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(Telemetry::format_time(42.5), "42.50s");
        assert_eq!(Telemetry::format_time(754.0), "12m 34.00s");
        assert_eq!(Telemetry::format_time(3725.0), "1h 2m 5.00s");
        assert_eq!(Telemetry::format_event(None), "never");
    }
}
