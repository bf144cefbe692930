use chrono::Utc;
use descent_simulation::*;
use log::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            SimulationConfig::load(&path)?
        }
        None => SimulationConfig::default(),
    };

    let mission = Mission::new(config)?;
    let outcome = mission.simulate();

    let wind = TawhiriClient::new()
        .map_err(SimulationError::from)
        .and_then(|client| mission.correct_for_wind(&outcome, &client, Utc::now()));
    let trajectory = match wind {
        Ok(corrected) => corrected,
        Err(e) => {
            error!("Wind correction failed, reporting windless descent: {}", e);
            outcome.trajectory.clone()
        }
    };

    if let Ok(path) = std::env::var("DESCENT_OUTPUT") {
        std::fs::write(&path, outcome.to_json(&trajectory)?)?;
        info!("Descent record written to {}", path);
    }

    println!("{}", Telemetry::new(&outcome, &trajectory));

    Ok(())
}
