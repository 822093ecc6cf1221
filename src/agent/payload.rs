use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Data returned by a successful capability call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    News(NewsPayload),
    Weather(WeatherReport),
    /// Anything without a dedicated renderer: repository and web search
    /// results, forecasts, source listings.
    Unstructured(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsPayload {
    #[serde(default, deserialize_with = "lenient_articles")]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_source")]
    pub source: Option<ArticleSource>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(
        default,
        rename = "publishedAt",
        alias = "published_at",
        deserialize_with = "lenient_string"
    )]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temp_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temp_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pressure: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weather: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub clouds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub units: Option<String>,
}

impl Payload {
    /// Classifies untyped JSON by key presence: an object with `articles` is
    /// `News`, one with `temperature` is `Weather`, anything else stays
    /// `Unstructured`. Fields of an unexpected type are dropped, never used
    /// to reject the classification.
    pub fn classify(value: Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Payload::Unstructured(value);
        };
        if obj.contains_key("articles") {
            match serde_json::from_value::<NewsPayload>(value.clone()) {
                Ok(news) => Payload::News(news),
                Err(_) => Payload::Unstructured(value),
            }
        } else if obj.contains_key("temperature") {
            match serde_json::from_value::<WeatherReport>(value.clone()) {
                Ok(report) => Payload::Weather(report),
                Err(_) => Payload::Unstructured(value),
            }
        } else {
            Payload::Unstructured(value)
        }
    }

    /// News and weather payloads always count as data; unstructured values
    /// are empty when null, false, zero or an empty string/array/object.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::News(_) | Payload::Weather(_) => false,
            Payload::Unstructured(value) => is_falsy(value),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::classify(value)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Some(v.to_string()),
        _ => None,
    })
}

/// Numbers as given, numeric strings parsed, anything else dropped.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_source<'de, D>(deserializer: D) -> Result<Option<ArticleSource>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_articles<'de, D>(deserializer: D) -> Result<Vec<Article>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}
