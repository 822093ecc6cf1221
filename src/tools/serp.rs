use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    agent::{payload::Payload, types::StepOutcome},
    error::Result,
    tools::{
        http::{build_client, fetch_json, field},
        registry::{CapabilityResult, Connector, ToolBuilder},
    },
};

pub const SERP_BASE_URL: &str = "https://serpapi.com/search";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_num_results")]
    pub num_results: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchNewsParams {
    pub query: String,
    #[serde(default = "default_num_results")]
    pub num_results: u32,
    #[serde(default)]
    pub time_period: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchImagesParams {
    pub query: String,
    #[serde(default = "default_num_results")]
    pub num_results: u32,
    #[serde(default)]
    pub image_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerBoxParams {
    pub query: String,
}

fn default_num_results() -> u32 {
    5
}

fn default_language() -> String {
    "en".to_string()
}

/// SerpAPI (Google search) connector.
pub struct SerpConnector {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl SerpConnector {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: SERP_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, mut query: Vec<(&str, String)>) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }
        query.push(("engine", "google".to_string()));
        self.client.get(&self.base_url).query(&query)
    }

    async fn get(&self, query: Vec<(&str, String)>) -> reqwest::Result<Value> {
        debug!("GET {}", self.base_url);
        fetch_json(self.request(query)).await
    }

    pub async fn search(&self, params: SearchParams) -> CapabilityResult {
        let mut query = vec![
            ("q", params.query),
            ("num", params.num_results.to_string()),
            ("hl", params.language),
        ];
        if let Some(location) = params.location {
            query.push(("location", location));
        }

        Ok(match self.get(query).await {
            Ok(data) => unstructured(map_results(
                &data,
                "organic_results",
                &["title", "link", "snippet", "displayed_link", "position"],
            )),
            Err(e) => request_failed(e),
        })
    }

    pub async fn search_news(&self, params: SearchNewsParams) -> CapabilityResult {
        let mut query = vec![
            ("q", params.query),
            ("num", params.num_results.to_string()),
            ("tbm", "nws".to_string()),
        ];
        if let Some(period) = params.time_period {
            query.push(("tbs", format!("qdr:{period}")));
        }

        Ok(match self.get(query).await {
            Ok(data) => unstructured(map_results(
                &data,
                "news_results",
                &["title", "link", "snippet", "source", "date", "thumbnail"],
            )),
            Err(e) => request_failed(e),
        })
    }

    pub async fn search_images(&self, params: SearchImagesParams) -> CapabilityResult {
        let mut query = vec![
            ("q", params.query),
            ("num", params.num_results.to_string()),
            ("tbm", "isch".to_string()),
        ];
        if let Some(image_type) = params.image_type {
            query.push(("tbs", format!("itp:{image_type}")));
        }

        Ok(match self.get(query).await {
            Ok(data) => unstructured(map_results(
                &data,
                "images_results",
                &["title", "link", "source", "thumbnail", "original", "position"],
            )),
            Err(e) => request_failed(e),
        })
    }

    pub async fn get_answer_box(&self, params: AnswerBoxParams) -> CapabilityResult {
        Ok(match self.get(vec![("q", params.query)]).await {
            Ok(data) => unstructured(map_answer_box(&data)),
            Err(e) => request_failed(e),
        })
    }
}

impl Connector for SerpConnector {
    fn into_tool(self: Arc<Self>) -> ToolBuilder {
        let web = self.clone();
        let news = self.clone();
        let images = self.clone();
        let answer = self;
        ToolBuilder::new("serp", "Perform web searches and get search results")
            .capability("search", move |p: SearchParams| {
                let c = web.clone();
                async move { c.search(p).await }
            })
            .capability("search_news", move |p: SearchNewsParams| {
                let c = news.clone();
                async move { c.search_news(p).await }
            })
            .capability("search_images", move |p: SearchImagesParams| {
                let c = images.clone();
                async move { c.search_images(p).await }
            })
            .capability("get_answer_box", move |p: AnswerBoxParams| {
                let c = answer.clone();
                async move { c.get_answer_box(p).await }
            })
    }
}

fn unstructured(value: Value) -> StepOutcome {
    StepOutcome::Success(Payload::Unstructured(value))
}

fn request_failed(e: reqwest::Error) -> StepOutcome {
    warn!("SERP API request failed: {}", e);
    StepOutcome::failure(format!("SERP API request failed: {e}"))
}

/// Projects each entry of `data[section]` onto `fields`.
pub fn map_results(data: &Value, section: &str, fields: &[&str]) -> Value {
    let results: Vec<Value> = data
        .get(section)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let projected = fields
                        .iter()
                        .map(|f| (f.to_string(), item.get(*f).cloned().unwrap_or(Value::Null)))
                        .collect();
                    Value::Object(projected)
                })
                .collect()
        })
        .unwrap_or_default();
    Value::Array(results)
}

/// Direct answer from the answer box, else the knowledge graph, else null.
pub fn map_answer_box(data: &Value) -> Value {
    if let Some(answer_box) = data.get("answer_box").filter(|v| !v.is_null()) {
        let answer = answer_box
            .get("answer")
            .filter(|v| !v.is_null())
            .or_else(|| answer_box.get("snippet"))
            .cloned()
            .unwrap_or(Value::Null);
        return json!({
            "answer": answer,
            "title": field(answer_box, "/title"),
            "link": field(answer_box, "/link"),
            "type": field(answer_box, "/type"),
        });
    }

    if let Some(graph) = data.get("knowledge_graph").filter(|v| !v.is_null()) {
        return json!({
            "answer": field(graph, "/description"),
            "title": field(graph, "/title"),
            "type": "knowledge_graph",
        });
    }

    Value::Null
}
