use once_cell::sync::Lazy;
use serde_json::json;

use crate::{
    error::Result,
    shared::GlobalConfig,
    tools::{
        FunctionInfo, ToolInfo, ToolListing, github::GithubConnector, news::NewsConnector,
        registry::ConnectorRegistry, serp::SerpConnector, weather::WeatherConnector,
    },
};

/// Static description of every connector capability, shared by the planner
/// prompt and the tool listing.
pub static TOOL_CATALOG: Lazy<Vec<ToolInfo>> = Lazy::new(|| {
    vec![
        ToolInfo::new(
            "weather",
            "Get weather information for cities worldwide",
            vec![
                FunctionInfo::new(
                    "get_current_weather",
                    "Get current weather for a city",
                    json!({
                        "city": "string, required: city name, e.g. \"Paris\"",
                        "units": "string, optional: metric | imperial | standard"
                    }),
                ),
                FunctionInfo::new(
                    "get_weather_forecast",
                    "Get weather forecast for the next 24 hours",
                    json!({"city": "string, required", "units": "string, optional"}),
                ),
                FunctionInfo::new(
                    "get_weather_by_coordinates",
                    "Get weather by lat/lon",
                    json!({
                        "lat": "number, required",
                        "lon": "number, required",
                        "units": "string, optional"
                    }),
                ),
            ],
        ),
        ToolInfo::new(
            "github",
            "Search GitHub repositories and get repository information",
            vec![
                FunctionInfo::new(
                    "search_repositories",
                    "Search for repositories",
                    json!({
                        "query": "string, required",
                        "sort": "string, optional: stars | forks | updated",
                        "limit": "integer, optional"
                    }),
                ),
                FunctionInfo::new(
                    "get_repository",
                    "Get details of a specific repository",
                    json!({"owner": "string, required", "repo": "string, required"}),
                ),
                FunctionInfo::new(
                    "get_user_repos",
                    "Get repositories for a user",
                    json!({"username": "string, required", "limit": "integer, optional"}),
                ),
            ],
        ),
        ToolInfo::new(
            "news",
            "Search and retrieve news articles",
            vec![
                FunctionInfo::new(
                    "get_top_headlines",
                    "Get top headlines by country/category",
                    json!({
                        "country": "string, optional",
                        "category": "string, optional",
                        "query": "string, optional",
                        "limit": "integer, optional"
                    }),
                ),
                FunctionInfo::new(
                    "search_news",
                    "Search for news articles",
                    json!({
                        "query": "string, required",
                        "from_date": "string, optional: YYYY-MM-DD",
                        "to_date": "string, optional: YYYY-MM-DD",
                        "language": "string, optional",
                        "sort_by": "string, optional: relevancy | popularity | publishedAt",
                        "limit": "integer, optional"
                    }),
                ),
                FunctionInfo::new(
                    "get_sources",
                    "Get available news sources",
                    json!({"category": "string, optional", "language": "string, optional"}),
                ),
            ],
        ),
        ToolInfo::new(
            "serp",
            "Perform web searches and get search results",
            vec![
                FunctionInfo::new(
                    "search",
                    "General web search",
                    json!({
                        "query": "string, required",
                        "num_results": "integer, optional",
                        "location": "string, optional",
                        "language": "string, optional"
                    }),
                ),
                FunctionInfo::new(
                    "search_news",
                    "Search for news",
                    json!({
                        "query": "string, required",
                        "num_results": "integer, optional",
                        "time_period": "string, optional: h | d | w | m | y"
                    }),
                ),
                FunctionInfo::new(
                    "search_images",
                    "Search for images",
                    json!({
                        "query": "string, required",
                        "num_results": "integer, optional",
                        "image_type": "string, optional"
                    }),
                ),
                FunctionInfo::new(
                    "get_answer_box",
                    "Get direct answers",
                    json!({"query": "string, required"}),
                ),
            ],
        ),
    ]
});

/// Builds the registry of the four data-source connectors from explicit
/// configuration.
pub fn instantiate_registry(config: &GlobalConfig) -> Result<ConnectorRegistry> {
    let keys = &config.api_keys;
    let registry = ConnectorRegistry::builder()
        .connector(WeatherConnector::new(
            keys.openweather.clone(),
            config.http_timeout,
        )?)
        .connector(GithubConnector::new(keys.github.clone(), config.http_timeout)?)
        .connector(NewsConnector::new(keys.news.clone(), config.http_timeout)?)
        .connector(SerpConnector::new(keys.serp.clone(), config.search_timeout)?)
        .build()?;
    Ok(registry)
}

/// The catalog annotated with credential presence.
pub fn list_tools(config: &GlobalConfig) -> Vec<ToolListing> {
    let status = config.api_keys.tool_status();
    TOOL_CATALOG
        .iter()
        .map(|info| ToolListing {
            info: info.clone(),
            configured: status.get(&info.name).copied().unwrap_or(false),
        })
        .collect()
}
