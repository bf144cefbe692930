//! Wind-profile source for drift correction.
//!
//! The production source is the CUSF Tawhiri balloon predictor, queried for
//! a descent from a given burst altitude. Its lat/long path is projected
//! onto a local plane centred on the first descent point.

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::LaunchSite;
use crate::constants::{
    EARTH_RADIUS, WIND_SERVICE_ASCENT_RATE, WIND_SERVICE_PROFILE, WIND_SERVICE_URL,
};

#[derive(Debug, Error)]
pub enum WindServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response contained no descent trajectory")]
    EmptyDescent,
}

/// Horizontal displacement (m) of the reference path at a given altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSample {
    pub x: f64,
    pub y: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescentProfileRequest {
    pub launch_site: LaunchSite,
    pub launch_time: DateTime<Utc>,
    pub burst_altitude: f64,
    pub descent_rate: f64,
}

impl DescentProfileRequest {
    pub fn query_parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("profile", WIND_SERVICE_PROFILE.to_string()),
            ("launch_latitude", self.launch_site.latitude.to_string()),
            ("launch_longitude", self.launch_site.longitude.to_string()),
            (
                "launch_datetime",
                self.launch_time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
            ("ascent_rate", WIND_SERVICE_ASCENT_RATE.to_string()),
            ("burst_altitude", self.burst_altitude.to_string()),
            ("descent_rate", self.descent_rate.to_string()),
        ]
    }
}

pub trait WindProfileProvider {
    fn fetch_descent_profile(
        &self,
        request: &DescentProfileRequest,
    ) -> Result<Vec<WindSample>, WindServiceError>;
}

/// Blocking client for the Tawhiri prediction API.
pub struct TawhiriClient {
    client: Client,
    base_url: String,
}

impl TawhiriClient {
    pub fn new() -> Result<Self, WindServiceError> {
        Self::with_base_url(WIND_SERVICE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, WindServiceError> {
        Ok(TawhiriClient {
            client: Client::builder().build()?,
            base_url: base_url.to_string(),
        })
    }
}

impl WindProfileProvider for TawhiriClient {
    fn fetch_descent_profile(
        &self,
        request: &DescentProfileRequest,
    ) -> Result<Vec<WindSample>, WindServiceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&request.query_parameters())
            .send()?;
        debug!("Wind service request: {}", response.url());

        let body = response.error_for_status()?.text()?;
        parse_descent_profile(&body)
    }
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    prediction: Vec<PredictionStage>,
}

#[derive(Debug, Deserialize)]
struct PredictionStage {
    stage: String,
    trajectory: Vec<PredictionPoint>,
}

#[derive(Debug, Deserialize)]
struct PredictionPoint {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

/// Extracts the descent legs of a prediction as local-plane samples.
pub fn parse_descent_profile(body: &str) -> Result<Vec<WindSample>, WindServiceError> {
    let response: PredictionResponse = serde_json::from_str(body)?;

    let samples: Vec<WindSample> = response
        .prediction
        .iter()
        .filter(|stage| stage.stage == "descent")
        .flat_map(|stage| project_descent(&stage.trajectory))
        .collect();

    if samples.is_empty() {
        return Err(WindServiceError::EmptyDescent);
    }
    Ok(samples)
}

fn project_descent(points: &[PredictionPoint]) -> Vec<WindSample> {
    let Some(origin) = points.first() else {
        return Vec::new();
    };

    points
        .iter()
        .map(|point| {
            let radius = EARTH_RADIUS + point.altitude;
            let delta_lat = point.latitude - origin.latitude;
            let delta_lon = wrap_longitude(point.longitude - origin.longitude);
            WindSample {
                x: radius * delta_lon.to_radians().sin(),
                y: radius * delta_lat.to_radians().sin(),
                altitude: point.altitude,
            }
        })
        .collect()
}

/// Maps a longitude difference into (-180, 180].
fn wrap_longitude(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
