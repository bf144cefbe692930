use serde::Serialize;

use crate::constants::{MAX_PREALLOCATED_SAMPLES, NOMINAL_DESCENT_RATE};
use crate::utils::vector3d::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub acceleration: Vector3D,
}

/// Append-only record of a descent, one sample per tick.
///
/// Sample `k` is the vehicle state at `k * time_step`; sample 0 is the
/// initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub time_step: f64,
    samples: Vec<TrajectorySample>,
}

/// Column layout of a trajectory for persisted output.
#[derive(Debug, Serialize)]
pub struct TrajectoryArrays {
    time_step: f64,
    positions: Vec<Vector3D>,
    velocities: Vec<Vector3D>,
    accelerations: Vec<Vector3D>,
}

impl Trajectory {
    pub fn new(time_step: f64) -> Self {
        Trajectory {
            time_step,
            samples: Vec::new(),
        }
    }

    /// Preallocates for a descent from `initial_altitude` at a nominal rate.
    pub fn for_descent(time_step: f64, initial_altitude: f64) -> Self {
        let estimate = (initial_altitude.max(0.0) / NOMINAL_DESCENT_RATE / time_step).ceil();
        let capacity = (estimate as usize).saturating_add(1).min(MAX_PREALLOCATED_SAMPLES);
        Trajectory {
            time_step,
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: TrajectorySample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrajectorySample> {
        self.samples.get(index)
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn altitude_at(&self, index: usize) -> Option<f64> {
        self.samples.get(index).map(|sample| sample.position.z)
    }

    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.time_step
    }

    pub fn duration(&self) -> f64 {
        self.time_at(self.samples.len().saturating_sub(1))
    }

    /// Same samples with each position shifted horizontally.
    ///
    /// `offsets` must have one entry per sample; the z component is ignored.
    pub fn with_horizontal_offsets(&self, offsets: &[Vector3D]) -> Trajectory {
        let samples = self
            .samples
            .iter()
            .zip(offsets)
            .map(|(sample, offset)| TrajectorySample {
                position: Vector3D::new(
                    sample.position.x + offset.x,
                    sample.position.y + offset.y,
                    sample.position.z,
                ),
                ..*sample
            })
            .collect();

        Trajectory {
            time_step: self.time_step,
            samples,
        }
    }

    /// Splits the samples into equal-length position, velocity and
    /// acceleration arrays.
    pub fn arrays(&self) -> TrajectoryArrays {
        TrajectoryArrays {
            time_step: self.time_step,
            positions: self.samples.iter().map(|s| s.position).collect(),
            velocities: self.samples.iter().map(|s| s.velocity).collect(),
            accelerations: self.samples.iter().map(|s| s.acceleration).collect(),
        }
    }
}
