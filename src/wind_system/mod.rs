pub mod drift;
pub mod interpolation;
pub mod provider;
