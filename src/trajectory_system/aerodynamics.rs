use std::f64::consts::PI;

use crate::utils::vector3d::Vector3D;

/// Quadratic drag model for a fixed reference area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aerodynamics {
    pub drag_coefficient: f64,
    pub reference_area: f64,
}

impl Aerodynamics {
    pub fn new(drag_coefficient: f64, reference_area: f64) -> Self {
        Aerodynamics {
            drag_coefficient,
            reference_area,
        }
    }

    /// Body of revolution seen end-on, e.g. the vehicle airframe.
    pub fn cylinder(drag_coefficient: f64, radius: f64) -> Self {
        Aerodynamics::new(drag_coefficient, PI * radius.powi(2))
    }

    /// Circular canopy of the given nominal diameter.
    pub fn canopy(drag_coefficient: f64, diameter: f64) -> Self {
        Aerodynamics::new(drag_coefficient, 0.25 * PI * diameter.powi(2))
    }

    pub fn calculate_drag_magnitude(&self, speed: f64, air_density: f64) -> f64 {
        self.calculate_dynamic_pressure(speed, air_density)
            * self.drag_coefficient
            * self.reference_area
    }

    /// Drag force opposing `velocity`; zero when the vehicle is at rest.
    pub fn calculate_drag(&self, velocity: Vector3D, air_density: f64) -> Vector3D {
        let drag_magnitude = self.calculate_drag_magnitude(velocity.magnitude(), air_density);
        -velocity.normalize() * drag_magnitude
    }

    fn calculate_dynamic_pressure(&self, speed: f64, air_density: f64) -> f64 {
        0.5 * air_density * speed.powi(2)
    }
}
