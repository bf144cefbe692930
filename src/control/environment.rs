//! Three-band standard atmosphere (NASA Glenn "Earth Atmosphere Model").
//!
//! Temperatures are in °C and pressures in kPa, which is what the band
//! formulas are fitted in; density comes out in kg/m³.

const STRATOSPHERE_BASE: f64 = 25_000.0; // m
const TROPOPAUSE: f64 = 11_000.0; // m
const CELSIUS_TO_KELVIN: f64 = 273.1;
const SPECIFIC_GAS_CONSTANT: f64 = 0.2869; // kJ/(kg·K)

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub air_density: f64,
    pub temperature: f64,
    pub pressure: f64,
}

impl Environment {
    pub fn at_altitude(altitude: f64) -> Self {
        let (temperature, pressure) = if altitude > STRATOSPHERE_BASE {
            // Upper stratosphere
            let temperature = -131.21 + 0.00299 * altitude;
            let pressure =
                2.488 * ((temperature + CELSIUS_TO_KELVIN) / 216.6).powf(-11.388);
            (temperature, pressure)
        } else if altitude > TROPOPAUSE {
            // Lower stratosphere, isothermal
            let temperature = -56.46;
            let pressure = 22.65 * (1.73 - 0.000157 * altitude).exp();
            (temperature, pressure)
        } else {
            // Troposphere, applies below sea level too
            let temperature = 15.04 - 0.00649 * altitude;
            let pressure = 101.29 * ((temperature + CELSIUS_TO_KELVIN) / 288.08).powf(5.256);
            (temperature, pressure)
        };

        Environment {
            air_density: pressure / (SPECIFIC_GAS_CONSTANT * (temperature + CELSIUS_TO_KELVIN)),
            temperature,
            pressure,
        }
    }
}

pub fn air_density(altitude: f64) -> f64 {
    Environment::at_altitude(altitude).air_density
}
