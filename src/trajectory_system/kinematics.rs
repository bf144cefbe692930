use crate::utils::vector3d::Vector3D;

#[derive(Debug, Clone)]
pub struct Kinematics {
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub acceleration: Vector3D,
    pub time: f64,
}

impl Kinematics {
    pub fn new(initial_altitude: f64, initial_velocity: Vector3D) -> Self {
        Kinematics {
            position: Vector3D::new(0.0, 0.0, initial_altitude),
            velocity: initial_velocity,
            acceleration: Vector3D::ZERO,
            time: 0.0,
        }
    }

    /// Advances one explicit Euler step under a constant net force.
    ///
    /// Position is advanced with the already-updated velocity.
    pub fn update(&mut self, delta_time: f64, net_force: Vector3D, mass: f64) {
        self.acceleration = net_force / mass;
        self.velocity += self.acceleration * delta_time;
        self.position += self.velocity * delta_time;
        self.time += delta_time;
    }

    pub fn get_altitude(&self) -> f64 {
        self.position.z
    }

    pub fn get_time(&self) -> f64 {
        self.time
    }

    pub fn get_velocity_magnitude(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub fn get_unit_velocity(&self) -> Vector3D {
        self.velocity.normalize()
    }

    pub fn has_landed(&self) -> bool {
        self.position.z <= 0.0
    }
}
