//! Weather tool backed by OpenWeatherMap's current-weather endpoint

use crate::tools::{describe_reqwest_error, ToolEnvelope, ToolError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const FETCH_FAILED: &str = "Failed to fetch weather";
const SERVICE_ERROR: &str = "Weather service error";

/// Normalized current weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City name as resolved by the provider
    pub city: Option<String>,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Short condition text, e.g. "light rain"
    pub description: Option<String>,
    /// Relative humidity in percent
    pub humidity: Option<u64>,
    /// Wind speed in metres per second
    pub wind_speed: Option<f64>,
}

#[derive(Deserialize)]
struct OwmResponse {
    name: Option<String>,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: Option<OwmWind>,
}

#[derive(Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: Option<u64>,
}

#[derive(Deserialize)]
struct OwmCondition {
    description: Option<String>,
}

#[derive(Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

impl From<OwmResponse> for WeatherReport {
    fn from(data: OwmResponse) -> Self {
        Self {
            city: data.name,
            temperature: data.main.temp,
            description: data.weather.into_iter().next().and_then(|w| w.description),
            humidity: data.main.humidity,
            wind_speed: data.wind.and_then(|w| w.speed),
        }
    }
}

/// OpenWeatherMap client
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("has_api_key", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WeatherClient {
    /// Create a client; without an API key every lookup fails fast
    pub fn new(http: reqwest::Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `get_weather(city)`
    pub async fn get_weather(&self, city: &str) -> ToolEnvelope {
        self.fetch(city).await.into()
    }

    async fn fetch(&self, city: &str) -> Result<WeatherReport, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ToolError::MissingCredential("OPENWEATHERMAP_API_KEY"))?;

        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(city = %city, "Fetching current weather");

        let response = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| ToolError::request(FETCH_FAILED, describe_reqwest_error(e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ToolError::CityNotFound);
        }
        if !status.is_success() {
            return Err(ToolError::request(SERVICE_ERROR, format!("HTTP {}", status)));
        }

        let data: OwmResponse = response
            .json()
            .await
            .map_err(|e| ToolError::request(FETCH_FAILED, describe_reqwest_error(e)))?;

        Ok(data.into())
    }
}
