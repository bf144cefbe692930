use log::info;

use super::parachute::Parachute;

/// Ordered recovery stages, highest deployment altitude first.
///
/// The sequence is the single writer of every stage's runtime fields.
pub struct DeploymentSequence {
    pub parachutes: Vec<Parachute>,
}

impl DeploymentSequence {
    pub fn new(parachutes: Vec<Parachute>) -> Self {
        DeploymentSequence { parachutes }
    }

    /// Runs one tick of the deployment state machine.
    ///
    /// A stage crossing its altitude for the first time supersedes every
    /// stage before it, which is cut away at the same instant.
    pub fn update(&mut self, altitude: f64, elapsed_time: f64, delta_time: f64) {
        for i in 0..self.parachutes.len() {
            if !self.parachutes[i].is_triggered(altitude) {
                continue;
            }

            if !self.parachutes[i].is_deployed() {
                self.parachutes[i].deploy(elapsed_time);
                info!(
                    "{} deployed at {:.2} s ({:.1} m)",
                    self.parachutes[i].name, elapsed_time, altitude
                );

                for superseded in self.parachutes[..i].iter_mut().filter(|p| !p.is_lost()) {
                    superseded.discard(elapsed_time);
                    info!("{} released at {:.2} s", superseded.name, elapsed_time);
                }
            }

            self.parachutes[i].inflate(delta_time);
        }
    }

    /// Records every stage's drag for this tick and returns the total.
    pub fn record_drag(&mut self, speed: f64, air_density: f64) -> f64 {
        self.parachutes
            .iter_mut()
            .map(|parachute| {
                let drag = parachute.calculate_drag_magnitude(speed, air_density);
                parachute.record_force(drag);
                drag
            })
            .sum()
    }

    pub fn land(&mut self, landing_time: f64) {
        for parachute in self.parachutes.iter_mut() {
            parachute.land(landing_time);
        }
    }

    pub fn active_parachute(&self) -> Option<&Parachute> {
        self.parachutes
            .iter()
            .find(|parachute| parachute.is_deployed() && !parachute.is_lost())
    }

    pub fn into_parachutes(self) -> Vec<Parachute> {
        self.parachutes
    }
}
