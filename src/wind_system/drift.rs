//! Post-hoc horizontal wind drift for a windless descent.
//!
//! Each recovery stage gets its own reference descent from the wind service.
//! The stage's altitudes are mapped through that profile and the per-stage
//! drift curves are chained end to start, so drift is continuous across
//! every handoff. The reference model is calibrated for light balloon
//! payloads, which drift further than a vehicle under canopy, so the
//! corrected landing point overestimates the real displacement.

use chrono::{DateTime, Utc};
use log::{info, warn};

use super::interpolation::QuadraticInterpolant;
use super::provider::{DescentProfileRequest, WindProfileProvider, WindServiceError};
use crate::config::LaunchSite;
use crate::control::parachute::{Parachute, StageSpan};
use crate::errors::SimulationError;
use crate::trajectory_system::trajectory::Trajectory;
use crate::utils::vector3d::Vector3D;

pub struct WindDriftCorrector<'a, P: WindProfileProvider> {
    provider: &'a P,
    launch_site: LaunchSite,
    launch_time: DateTime<Utc>,
}

impl<'a, P: WindProfileProvider> WindDriftCorrector<'a, P> {
    pub fn new(provider: &'a P, launch_site: LaunchSite, launch_time: DateTime<Utc>) -> Self {
        WindDriftCorrector {
            provider,
            launch_site,
            launch_time,
        }
    }

    /// Returns a copy of `trajectory` with wind drift added to x and y.
    ///
    /// Stages that never opened are skipped with a warning; any wind-service
    /// failure aborts the whole correction.
    pub fn correct(
        &self,
        trajectory: &Trajectory,
        parachutes: &[Parachute],
    ) -> Result<Trajectory, SimulationError> {
        let mut displacements = vec![Vector3D::ZERO; trajectory.len()];
        let mut offset = Vector3D::ZERO;
        let mut filled_to = 0;

        for parachute in parachutes {
            let span = match parachute.span(trajectory.time_step, trajectory.len()) {
                Ok(span) if !span.is_empty() => span,
                Ok(_) => {
                    info!("{} carried the vehicle for no samples, no drift", parachute.name);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping wind correction: {}", e);
                    continue;
                }
            };

            // Hold the previous drift across any gap before this stage.
            for displacement in &mut displacements[filled_to..span.deploy_index.max(filled_to)] {
                *displacement = offset;
            }

            let segment = self.stage_drift(trajectory, parachute, span)?;
            for (index, drift) in (span.deploy_index..span.discard_index).zip(segment) {
                displacements[index] = offset + drift;
            }

            offset = displacements[span.discard_index - 1];
            filled_to = filled_to.max(span.discard_index);
        }

        for displacement in &mut displacements[filled_to..] {
            *displacement = offset;
        }

        Ok(trajectory.with_horizontal_offsets(&displacements))
    }

    /// Drift of one stage relative to its deployment point.
    fn stage_drift(
        &self,
        trajectory: &Trajectory,
        parachute: &Parachute,
        span: StageSpan,
    ) -> Result<Vec<Vector3D>, SimulationError> {
        let altitudes: Vec<f64> = trajectory.samples()[span.deploy_index..span.discard_index]
            .iter()
            .map(|sample| sample.position.z)
            .collect();
        let burst_altitude = altitudes[0];
        let discard_altitude = trajectory
            .altitude_at(span.discard_index)
            .unwrap_or(burst_altitude);
        let elapsed = trajectory.time_at(span.discard_index) - trajectory.time_at(span.deploy_index);

        let request = DescentProfileRequest {
            launch_site: self.launch_site,
            launch_time: self.launch_time,
            burst_altitude,
            descent_rate: (burst_altitude - discard_altitude) / elapsed,
        };
        info!(
            "Requesting wind profile for {} from {:.1} m at {:.2} m/s",
            parachute.name, request.burst_altitude, request.descent_rate
        );

        let profile = self.provider.fetch_descent_profile(&request)?;
        let x_of_altitude =
            QuadraticInterpolant::new(profile.iter().map(|sample| (sample.altitude, sample.x)))
                .ok_or(WindServiceError::EmptyDescent)?;
        let y_of_altitude =
            QuadraticInterpolant::new(profile.iter().map(|sample| (sample.altitude, sample.y)))
                .ok_or(WindServiceError::EmptyDescent)?;

        let origin = Vector3D::new(
            x_of_altitude.evaluate(burst_altitude),
            y_of_altitude.evaluate(burst_altitude),
            0.0,
        );
        Ok(altitudes
            .iter()
            .map(|&altitude| {
                Vector3D::new(
                    x_of_altitude.evaluate(altitude),
                    y_of_altitude.evaluate(altitude),
                    0.0,
                ) - origin
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParachuteConfig;
    use crate::trajectory_system::trajectory::TrajectorySample;
    use crate::wind_system::provider::WindSample;
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use std::cell::RefCell;

    /// Drift proportional to altitude lost below the burst point.
    struct LinearWind {
        per_metre: (f64, f64),
        requests: RefCell<Vec<DescentProfileRequest>>,
    }

    impl LinearWind {
        fn new(per_metre: (f64, f64)) -> Self {
            LinearWind {
                per_metre,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl WindProfileProvider for LinearWind {
        fn fetch_descent_profile(
            &self,
            request: &DescentProfileRequest,
        ) -> Result<Vec<WindSample>, WindServiceError> {
            self.requests.borrow_mut().push(request.clone());
            let top = request.burst_altitude;
            Ok((0..=10)
                .map(|i| {
                    let altitude = top * (1.0 - i as f64 / 10.0);
                    let drop = top - altitude;
                    WindSample {
                        x: self.per_metre.0 * drop,
                        y: self.per_metre.1 * drop,
                        altitude,
                    }
                })
                .collect())
        }
    }

    struct FailingWind;

    impl WindProfileProvider for FailingWind {
        fn fetch_descent_profile(
            &self,
            _request: &DescentProfileRequest,
        ) -> Result<Vec<WindSample>, WindServiceError> {
            Err(WindServiceError::EmptyDescent)
        }
    }

    /// Uneven, non-linear reference path, independent of the request.
    struct IrregularWind;

    impl WindProfileProvider for IrregularWind {
        fn fetch_descent_profile(
            &self,
            _request: &DescentProfileRequest,
        ) -> Result<Vec<WindSample>, WindServiceError> {
            Ok([
                (4_200.0, 2_100.0),
                (4_000.0, 2_000.0),
                (1_500.0, 450.0),
                (1_000.0, 400.0),
                (0.0, 0.0),
            ]
            .iter()
            .map(|&(altitude, x)| WindSample {
                x,
                y: -0.5 * x,
                altitude,
            })
            .collect())
        }
    }

    fn launch_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    /// 1 m per tick from 100 m to 0 m with dt = 1 s.
    fn linear_descent() -> Trajectory {
        let mut trajectory = Trajectory::new(1.0);
        for i in 0..=100 {
            trajectory.push(TrajectorySample {
                position: Vector3D::new(2.0, -1.0, 100.0 - i as f64),
                velocity: Vector3D::new(0.0, 0.0, -1.0),
                acceleration: Vector3D::ZERO,
            });
        }
        trajectory
    }

    fn stage(name: &str, deploy_altitude: f64, deploy: f64, discard: f64) -> Parachute {
        let mut parachute =
            Parachute::new(&ParachuteConfig::new(name, deploy_altitude, 1.0, 0.5));
        parachute.deploy(deploy);
        parachute.discard(discard);
        parachute
    }

    #[test]
    fn test_zero_wind_leaves_trajectory_unchanged() {
        let trajectory = linear_descent();
        let parachutes = vec![stage("Drogue", 100.0, 0.0, 60.0), stage("Main", 40.0, 60.0, 100.0)];
        let provider = LinearWind::new((0.0, 0.0));

        let corrected = WindDriftCorrector::new(&provider, LaunchSite::default(), launch_time())
            .correct(&trajectory, &parachutes)
            .unwrap();

        assert_eq!(corrected, trajectory);
        assert_eq!(provider.requests.borrow().len(), 2);
    }

    #[test]
    fn test_stages_are_chained_continuously() {
        let trajectory = linear_descent();
        let parachutes = vec![
            stage("Drogue", 100.0, 0.0, 30.0),
            stage("Reefed", 70.0, 30.0, 60.0),
            stage("Main", 40.0, 60.0, 100.0),
        ];
        let provider = LinearWind::new((0.5, -0.25));

        let corrected = WindDriftCorrector::new(&provider, LaunchSite::default(), launch_time())
            .correct(&trajectory, &parachutes)
            .unwrap();

        assert_eq!(corrected.len(), trajectory.len());
        for boundary in [30, 60] {
            let before = corrected.samples()[boundary - 1].position;
            let after = corrected.samples()[boundary].position;
            assert_relative_eq!(before.x, after.x, epsilon = 1e-9);
            assert_relative_eq!(before.y, after.y, epsilon = 1e-9);
        }

        // Each stage drifts 0.5 m east per metre of its own descent, less
        // the tick that is spent on each handoff.
        let landing = corrected.last().unwrap().position;
        assert_relative_eq!(landing.x, 2.0 + 0.5 * (29.0 + 29.0 + 39.0), epsilon = 1e-6);
        assert_relative_eq!(landing.y, -1.0 - 0.25 * (29.0 + 29.0 + 39.0), epsilon = 1e-6);
        assert_eq!(landing.z, 0.0);
    }

    #[test]
    fn test_request_uses_stage_descent_rate() {
        let trajectory = linear_descent();
        let parachutes = vec![stage("Drogue", 100.0, 10.0, 50.0)];
        let provider = LinearWind::new((0.0, 0.0));

        WindDriftCorrector::new(&provider, LaunchSite::default(), launch_time())
            .correct(&trajectory, &parachutes)
            .unwrap();

        let requests = provider.requests.borrow();
        assert_eq!(requests[0].burst_altitude, 90.0);
        assert_relative_eq!(requests[0].descent_rate, 1.0, epsilon = 1e-12);
        assert_eq!(requests[0].launch_time, launch_time());
    }

    #[test]
    fn test_unopened_stage_is_skipped() {
        let trajectory = linear_descent();
        let unopened = Parachute::new(&ParachuteConfig::new("Main", 10.0, 4.0, 1.0));
        let parachutes = vec![stage("Drogue", 100.0, 0.0, 100.0), unopened];
        let provider = LinearWind::new((1.0, 0.0));

        let corrected = WindDriftCorrector::new(&provider, LaunchSite::default(), launch_time())
            .correct(&trajectory, &parachutes)
            .unwrap();

        assert_eq!(provider.requests.borrow().len(), 1);
        assert_relative_eq!(corrected.last().unwrap().position.x, 2.0 + 99.0, epsilon = 1e-6);
    }

    #[test]
    fn test_samples_before_first_stage_do_not_drift() {
        let trajectory = linear_descent();
        let parachutes = vec![stage("Drogue", 80.0, 20.0, 100.0)];
        let provider = LinearWind::new((1.0, 1.0));

        let corrected = WindDriftCorrector::new(&provider, LaunchSite::default(), launch_time())
            .correct(&trajectory, &parachutes)
            .unwrap();

        for index in 0..=20 {
            assert_eq!(corrected.samples()[index], trajectory.samples()[index]);
        }
        assert!(corrected.samples()[21].position.x > 2.0);
    }

    #[test]
    fn test_service_failure_aborts_correction() {
        let trajectory = linear_descent();
        let parachutes = vec![stage("Drogue", 100.0, 0.0, 100.0)];

        let result = WindDriftCorrector::new(&FailingWind, LaunchSite::default(), launch_time())
            .correct(&trajectory, &parachutes);

        assert!(matches!(
            result,
            Err(SimulationError::WindServiceFailure(WindServiceError::EmptyDescent))
        ));
    }

    #[test]
    fn test_drift_is_smooth_through_irregular_profile() {
        let mut trajectory = Trajectory::new(1.0);
        for i in 0..=4_200 {
            trajectory.push(TrajectorySample {
                position: Vector3D::new(0.0, 0.0, 4_200.0 - i as f64),
                velocity: Vector3D::new(0.0, 0.0, -1.0),
                acceleration: Vector3D::ZERO,
            });
        }
        let parachutes = vec![stage("Main", 4_200.0, 0.0, 4_200.0)];

        let corrected = WindDriftCorrector::new(&IrregularWind, LaunchSite::default(), launch_time())
            .correct(&trajectory, &parachutes)
            .unwrap();

        for (i, pair) in corrected.samples().windows(2).enumerate() {
            let dx = (pair[1].position.x - pair[0].position.x).abs();
            let dy = (pair[1].position.y - pair[0].position.y).abs();
            assert!(dx < 2.0 && dy < 1.0, "drift jumped {} m at sample {}", dx, i);
        }
        // 1 m above ground the path is back on the profile's last leg.
        let last_drift = corrected.samples()[4_199].position;
        assert_relative_eq!(last_drift.x, -2_100.0, epsilon = 2.0);
        assert_relative_eq!(last_drift.y, 1_050.0, epsilon = 1.0);
    }
}
