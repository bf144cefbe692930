pub mod deployment;
pub mod environment;
pub mod mission;
pub mod parachute;
pub mod shock_load;
