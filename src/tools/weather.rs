use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    agent::{
        payload::{Payload, WeatherReport},
        types::StepOutcome,
    },
    error::Result,
    tools::{
        http::{build_client, f64_at, fetch_json, field, str_at},
        registry::{CapabilityResult, Connector, ToolBuilder},
    },
};

pub const WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Three-hour slots covering the next day.
const FORECAST_SLOTS: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityParams {
    pub city: String,
    #[serde(default = "default_units")]
    pub units: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoordinateParams {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_units() -> String {
    "metric".to_string()
}

/// OpenWeather connector.
pub struct WeatherConnector {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherConnector {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: WEATHER_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, endpoint: &str, mut query: Vec<(&str, String)>) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            query.push(("appid", key.clone()));
        }
        self.client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&query)
    }

    async fn get(&self, endpoint: &str, query: Vec<(&str, String)>) -> reqwest::Result<Value> {
        debug!("GET {}/{}", self.base_url, endpoint);
        fetch_json(self.request(endpoint, query)).await
    }

    pub async fn get_current_weather(&self, params: CityParams) -> CapabilityResult {
        let query = vec![("q", params.city.clone()), ("units", params.units.clone())];
        Ok(match self.get("weather", query).await {
            Ok(data) => {
                StepOutcome::Success(Payload::Weather(map_current_weather(&data, &params.units)))
            }
            Err(e) => request_failed(e),
        })
    }

    pub async fn get_weather_forecast(&self, params: CityParams) -> CapabilityResult {
        let query = vec![("q", params.city.clone()), ("units", params.units.clone())];
        Ok(match self.get("forecast", query).await {
            Ok(data) => StepOutcome::Success(Payload::Unstructured(map_forecast(
                &data,
                &params.units,
            ))),
            Err(e) => request_failed(e),
        })
    }

    pub async fn get_weather_by_coordinates(&self, params: CoordinateParams) -> CapabilityResult {
        let query = vec![
            ("lat", params.lat.to_string()),
            ("lon", params.lon.to_string()),
            ("units", params.units.clone()),
        ];
        Ok(match self.get("weather", query).await {
            Ok(data) => StepOutcome::Success(Payload::Weather(map_coordinate_weather(
                &data,
                &params.units,
            ))),
            Err(e) => request_failed(e),
        })
    }
}

impl Connector for WeatherConnector {
    fn into_tool(self: Arc<Self>) -> ToolBuilder {
        let current = self.clone();
        let forecast = self.clone();
        let coords = self;
        ToolBuilder::new("weather", "Get weather information for cities worldwide")
            .capability("get_current_weather", move |p: CityParams| {
                let c = current.clone();
                async move { c.get_current_weather(p).await }
            })
            .capability("get_weather_forecast", move |p: CityParams| {
                let c = forecast.clone();
                async move { c.get_weather_forecast(p).await }
            })
            .capability("get_weather_by_coordinates", move |p: CoordinateParams| {
                let c = coords.clone();
                async move { c.get_weather_by_coordinates(p).await }
            })
    }
}

fn request_failed(e: reqwest::Error) -> StepOutcome {
    warn!("Weather API request failed: {}", e);
    StepOutcome::failure(format!("Weather API request failed: {e}"))
}

pub fn units_label(units: &str) -> &'static str {
    match units {
        "metric" => "°C",
        "imperial" => "°F",
        _ => "K",
    }
}

pub fn map_current_weather(data: &Value, units: &str) -> WeatherReport {
    WeatherReport {
        location: None,
        city: str_at(data, "/name"),
        country: str_at(data, "/sys/country"),
        temperature: f64_at(data, "/main/temp"),
        feels_like: f64_at(data, "/main/feels_like"),
        temp_min: f64_at(data, "/main/temp_min"),
        temp_max: f64_at(data, "/main/temp_max"),
        humidity: f64_at(data, "/main/humidity"),
        pressure: f64_at(data, "/main/pressure"),
        weather: str_at(data, "/weather/0/main"),
        description: str_at(data, "/weather/0/description"),
        wind_speed: f64_at(data, "/wind/speed"),
        clouds: f64_at(data, "/clouds/all"),
        units: Some(units_label(units).to_string()),
    }
}

pub fn map_coordinate_weather(data: &Value, units: &str) -> WeatherReport {
    let name = str_at(data, "/name").unwrap_or_default();
    let country = str_at(data, "/sys/country").unwrap_or_default();
    WeatherReport {
        location: Some(format!("{name}, {country}")),
        temperature: f64_at(data, "/main/temp"),
        feels_like: f64_at(data, "/main/feels_like"),
        humidity: f64_at(data, "/main/humidity"),
        weather: str_at(data, "/weather/0/main"),
        description: str_at(data, "/weather/0/description"),
        wind_speed: f64_at(data, "/wind/speed"),
        units: Some(units_label(units).to_string()),
        ..Default::default()
    }
}

pub fn map_forecast(data: &Value, units: &str) -> Value {
    let forecasts: Vec<Value> = data
        .get("list")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(FORECAST_SLOTS)
                .map(|item| {
                    json!({
                        "datetime": field(item, "/dt_txt"),
                        "temperature": field(item, "/main/temp"),
                        "weather": field(item, "/weather/0/main"),
                        "description": field(item, "/weather/0/description"),
                        "humidity": field(item, "/main/humidity"),
                        "wind_speed": field(item, "/wind/speed"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({
        "city": field(data, "/city/name"),
        "country": field(data, "/city/country"),
        "forecasts": forecasts,
        "units": units_label(units),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        json!({
            "name": "Paris",
            "sys": {"country": "FR"},
            "main": {"temp": 21.0, "feels_like": 20.5, "humidity": 40, "pressure": 1012},
            "weather": [{"main": "Clear", "description": "clear sky"}],
            "wind": {"speed": 3.1},
            "clouds": {"all": 0}
        })
    }

    #[test]
    fn test_map_current_weather() {
        let report = map_current_weather(&sample(), "metric");
        assert_eq!(report.city.as_deref(), Some("Paris"));
        assert_eq!(report.temperature, Some(21.0));
        assert_eq!(report.description.as_deref(), Some("clear sky"));
        assert_eq!(report.wind_speed, Some(3.1));
        assert_eq!(report.units.as_deref(), Some("°C"));
    }

    #[test]
    fn test_coordinates_build_location() {
        let report = map_coordinate_weather(&sample(), "imperial");
        assert_eq!(report.location.as_deref(), Some("Paris, FR"));
        assert_eq!(report.units.as_deref(), Some("°F"));
        assert!(report.city.is_none());
    }

    #[test]
    fn test_forecast_keeps_first_day() {
        let list: Vec<Value> = (0..12)
            .map(|i| json!({"dt_txt": format!("slot {i}"), "main": {"temp": i}}))
            .collect();
        let data = json!({"city": {"name": "Oslo", "country": "NO"}, "list": list});

        let forecast = map_forecast(&data, "standard");
        assert_eq!(forecast["forecasts"].as_array().unwrap().len(), 8);
        assert_eq!(forecast["units"], "K");
        assert_eq!(forecast["city"], "Oslo");
    }

    #[test]
    fn test_city_params_reject_unknown_names() {
        let ok: CityParams = serde_json::from_value(json!({"city": "Paris"})).unwrap();
        assert_eq!(ok.units, "metric");

        let bad = serde_json::from_value::<CityParams>(json!({"location": "Paris"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_key_only_sent_when_configured() {
        let anonymous = WeatherConnector::new(None, Duration::from_secs(1)).unwrap();
        let request = anonymous
            .request("weather", vec![("q", "Paris".to_string())])
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("q=Paris"));

        let keyed = WeatherConnector::new(Some("k1".into()), Duration::from_secs(1)).unwrap();
        let request = keyed
            .request("weather", vec![("q", "Paris".to_string())])
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("q=Paris&appid=k1"));
    }
}
