use std::{sync::Arc, time::Duration};

use chrono::{Local, NaiveDate};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    agent::{
        payload::{Article, NewsPayload, Payload},
        types::StepOutcome,
    },
    error::{Result, agent_error::CapabilityError},
    tools::{
        http::{build_client, fetch_json, field},
        registry::{CapabilityResult, Connector, ToolBuilder},
    },
};

pub const NEWS_BASE_URL: &str = "https://newsapi.org/v2";

/// Default look-back window for searches without a start date.
const SEARCH_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadlinesParams {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchNewsParams {
    pub query: String,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_country() -> String {
    "us".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_sort_by() -> String {
    "relevancy".to_string()
}

fn default_limit() -> u32 {
    5
}

/// NewsAPI connector.
pub struct NewsConnector {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsConnector {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: NEWS_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, endpoint: &str, mut query: Vec<(&str, String)>) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            query.push(("apiKey", key.clone()));
        }
        self.client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&query)
    }

    async fn get(&self, endpoint: &str, query: Vec<(&str, String)>) -> reqwest::Result<Value> {
        debug!("GET {}/{}", self.base_url, endpoint);
        fetch_json(self.request(endpoint, query)).await
    }

    pub async fn get_top_headlines(&self, params: HeadlinesParams) -> CapabilityResult {
        let mut query = vec![("pageSize", params.limit.to_string())];
        if !params.country.is_empty() {
            query.push(("country", params.country));
        }
        if let Some(category) = params.category {
            query.push(("category", category));
        }
        if let Some(q) = params.query {
            query.push(("q", q));
        }

        match self.get("top-headlines", query).await {
            Ok(data) => articles_outcome(&data),
            Err(e) => Ok(request_failed(e)),
        }
    }

    pub async fn search_news(&self, params: SearchNewsParams) -> CapabilityResult {
        let today = Local::now().date_naive();
        let (from, to) = search_window(params.from_date, params.to_date, today);
        let query = vec![
            ("q", params.query),
            ("from", from),
            ("to", to),
            ("language", params.language),
            ("sortBy", params.sort_by),
            ("pageSize", params.limit.to_string()),
        ];

        match self.get("everything", query).await {
            Ok(data) => articles_outcome(&data),
            Err(e) => Ok(request_failed(e)),
        }
    }

    pub async fn get_sources(&self, params: SourcesParams) -> CapabilityResult {
        let mut query = vec![("language", params.language)];
        if let Some(category) = params.category {
            query.push(("category", category));
        }

        Ok(match self.get("sources", query).await {
            Ok(data) => StepOutcome::Success(Payload::Unstructured(map_sources(&data))),
            Err(e) => request_failed(e),
        })
    }
}

impl Connector for NewsConnector {
    fn into_tool(self: Arc<Self>) -> ToolBuilder {
        let headlines = self.clone();
        let search = self.clone();
        let sources = self;
        ToolBuilder::new("news", "Search and retrieve news articles")
            .capability("get_top_headlines", move |p: HeadlinesParams| {
                let c = headlines.clone();
                async move { c.get_top_headlines(p).await }
            })
            .capability("search_news", move |p: SearchNewsParams| {
                let c = search.clone();
                async move { c.search_news(p).await }
            })
            .capability("get_sources", move |p: SourcesParams| {
                let c = sources.clone();
                async move { c.get_sources(p).await }
            })
    }
}

fn request_failed(e: reqwest::Error) -> StepOutcome {
    warn!("News API request failed: {}", e);
    StepOutcome::failure(format!("News API request failed: {e}"))
}

/// Fills in the default look-back window: from a week ago up to today.
pub fn search_window(
    from_date: Option<String>,
    to_date: Option<String>,
    today: NaiveDate,
) -> (String, String) {
    let from = from_date.filter(|d| !d.is_empty()).unwrap_or_else(|| {
        (today - chrono::Duration::days(SEARCH_WINDOW_DAYS))
            .format("%Y-%m-%d")
            .to_string()
    });
    let to = to_date
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    (from, to)
}

pub fn parse_articles(data: &Value) -> std::result::Result<Vec<Article>, CapabilityError> {
    match data.get("articles") {
        Some(articles) => serde_json::from_value(articles.clone())
            .map_err(|e| CapabilityError::Internal(format!("unexpected articles shape: {e}"))),
        None => Ok(Vec::new()),
    }
}

fn articles_outcome(data: &Value) -> CapabilityResult {
    let articles = parse_articles(data)?;
    Ok(StepOutcome::Success(Payload::News(NewsPayload { articles })))
}

pub fn map_sources(data: &Value) -> Value {
    let sources: Vec<Value> = data
        .get("sources")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|source| {
                    json!({
                        "id": field(source, "/id"),
                        "name": field(source, "/name"),
                        "description": field(source, "/description"),
                        "url": field(source, "/url"),
                        "category": field(source, "/category"),
                        "country": field(source, "/country"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Value::Array(sources)
}
