// Physical Constants
pub const GRAVITY: f64 = 9.81; // m/s²
pub const EARTH_RADIUS: f64 = 6_371_000.0; // meters
pub const LBF_TO_NEWTONS: f64 = 4.448; // N per pound-force

// Shock Cord Constants
pub const ULTIMATE_TENSILE_STRAIN: f64 = 0.015; // nylon webbing

// Vehicle Body Constants (long cylinder)
pub const BODY_DRAG_COEFFICIENT: f64 = 0.82;
pub const BODY_RADIUS: f64 = 0.178; // m

// Parachute Defaults
pub const PARACHUTE_DRAG_COEFFICIENT: f64 = 2.1; // Fruity Chutes approx.
pub const PARACHUTE_RATED_LOAD_LBF: f64 = 2400.0; // lbf
pub const SHOCK_CORD_LENGTH: f64 = 5.0; // m
pub const PARACHUTE_RAMP_DURATION: f64 = 1.0; // s

// Simulation Parameters
pub const TIME_STEP: f64 = 0.05; // s
pub const INITIAL_ALTITUDE: f64 = 15_000.0; // m
pub const DRY_MASS: f64 = 50.0; // kg
pub const NOMINAL_DESCENT_RATE: f64 = 5.0; // m/s, only used to size buffers
pub const MAX_PREALLOCATED_SAMPLES: usize = 1 << 20;

// Default launch site when no location is supplied (Cambridge, UK)
pub const DEFAULT_LAUNCH_LATITUDE: f64 = 52.202541; // deg
pub const DEFAULT_LAUNCH_LONGITUDE: f64 = 0.131240; // deg

// Wind Prediction Service (Tawhiri API)
pub const WIND_SERVICE_URL: &str = "http://predict.cusf.co.uk/api/v1/";
pub const WIND_SERVICE_PROFILE: &str = "standard_profile";
pub const WIND_SERVICE_ASCENT_RATE: f64 = 450.0; // m/s
