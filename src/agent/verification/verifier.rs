use tracing::{debug, info};

use crate::agent::{
    payload::{NewsPayload, Payload, WeatherReport},
    plan::Plan,
    types::{ExecutionResult, VerificationResult},
};

pub const EXECUTION_ERRORS: &str = "Execution errors occurred";
pub const NO_DATA: &str = "No data returned from tools";
pub const NO_ARTICLES: &str = "No relevant news articles were found.";

const NEWS_HEADER: &str = "Here are the most relevant news articles:\n";

#[derive(Debug, Default, Clone)]
pub struct Verifier;

impl Verifier {
    /// Decides whether the execution answered the task and renders the
    /// answer. Never fails: anything wrong downstream becomes an incomplete
    /// result.
    pub fn verify_results(
        &self,
        task: &str,
        execution_result: &ExecutionResult,
        plan: &Plan,
    ) -> VerificationResult {
        debug!(
            "Verifying results for '{}' (expected: {})",
            task, plan.expected_output
        );

        if !execution_result.errors.is_empty() {
            info!(
                "Verification incomplete: {} step errors",
                execution_result.errors.len()
            );
            return VerificationResult::incomplete(EXECUTION_ERRORS, execution_result.clone());
        }

        let Some(final_data) = execution_result
            .final_data
            .as_ref()
            .filter(|data| !data.is_empty())
        else {
            info!("Verification incomplete: no final data");
            return VerificationResult::incomplete(NO_DATA, execution_result.clone());
        };

        VerificationResult::complete(format_final_answer(final_data))
    }
}

pub fn format_final_answer(data: &Payload) -> String {
    match data {
        Payload::News(news) => format_news(news),
        Payload::Weather(report) => format_weather(report),
        Payload::Unstructured(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

fn format_news(news: &NewsPayload) -> String {
    if news.articles.is_empty() {
        return NO_ARTICLES.to_string();
    }

    let mut lines = vec![NEWS_HEADER.to_string()];
    for (i, article) in news.articles.iter().enumerate() {
        let title = article.title.as_deref().unwrap_or("No title");
        let source = article
            .source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("Unknown source");
        let published = article.published_at.as_deref().unwrap_or("Unknown date");
        let url = article.url.as_deref().unwrap_or("");

        lines.push(format!(
            "{}. {}\n   Source: {}\n   Published: {}\n   Link: {}\n",
            i + 1,
            title,
            source,
            published,
            url
        ));
    }
    lines.join("\n")
}

fn format_weather(report: &WeatherReport) -> String {
    format!(
        "Current Weather Report:\nTemperature: {} {}\nCondition: {}\nHumidity: {}%\nWind Speed: {} m/s",
        number(report.temperature),
        report.units.as_deref().unwrap_or(""),
        report.description.as_deref().unwrap_or("N/A"),
        number(report.humidity),
        number(report.wind_speed)
    )
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::agent::{
        plan::step_key,
        types::{Confidence, StepError, StepOutcome},
    };

    fn result_with(final_data: serde_json::Value) -> ExecutionResult {
        let payload = Payload::classify(final_data);
        let mut result = ExecutionResult::new("task");
        result
            .raw_data
            .insert(step_key(1), StepOutcome::Success(payload.clone()));
        result.final_data = Some(payload);
        result
    }

    #[test]
    fn test_empty_articles() {
        let verification =
            Verifier.verify_results("news", &result_with(json!({"articles": []})), &Plan::default());
        assert!(verification.is_complete);
        assert_eq!(verification.confidence, Confidence::High);
        assert_eq!(verification.final_answer, NO_ARTICLES);
    }

    #[test]
    fn test_weather_report_lines() {
        let result = result_with(json!({
            "temperature": 21,
            "units": "°C",
            "description": "clear sky",
            "humidity": 40,
            "wind_speed": 3.1
        }));
        let answer = Verifier
            .verify_results("weather", &result, &Plan::default())
            .final_answer;

        let lines: Vec<&str> = answer.lines().collect();
        assert!(lines.contains(&"Temperature: 21 °C"));
        assert!(lines.contains(&"Condition: clear sky"));
        assert!(lines.contains(&"Humidity: 40%"));
        assert!(lines.contains(&"Wind Speed: 3.1 m/s"));
    }

    #[test]
    fn test_news_rendering_defaults() {
        let result = result_with(json!({
            "articles": [
                {"title": "Rust 2024 ships", "source": {"name": "Blog"},
                 "publishedAt": "2025-02-20", "url": "https://example.com"},
                {}
            ]
        }));
        let answer = Verifier
            .verify_results("news", &result, &Plan::default())
            .final_answer;

        assert!(answer.starts_with(NEWS_HEADER));
        assert!(answer.contains("1. Rust 2024 ships\n   Source: Blog\n   Published: 2025-02-20\n   Link: https://example.com\n"));
        assert!(answer.contains("2. No title\n   Source: Unknown source\n   Published: Unknown date\n   Link: \n"));
    }

    #[test]
    fn test_errors_make_result_incomplete() {
        let mut result = result_with(json!({"temperature": 1}));
        result.errors.push(StepError {
            step: 1,
            error: "Tool 'foo' not found".into(),
        });

        let verification = Verifier.verify_results("t", &result, &Plan::default());
        assert!(!verification.is_complete);
        assert_eq!(verification.confidence, Confidence::Low);
        assert_eq!(verification.issues_found, vec![EXECUTION_ERRORS.to_string()]);
        assert_eq!(
            verification.final_answer,
            "Unable to fully complete the task: Execution errors occurred."
        );
        assert_eq!(verification.raw_results.as_ref(), Some(&result));
    }

    #[test]
    fn test_missing_or_empty_final_data() {
        let verification =
            Verifier.verify_results("t", &ExecutionResult::new("t"), &Plan::default());
        assert_eq!(verification.issues_found, vec![NO_DATA.to_string()]);

        let verification = Verifier.verify_results("t", &result_with(json!([])), &Plan::default());
        assert!(!verification.is_complete);
        assert_eq!(verification.issues_found, vec![NO_DATA.to_string()]);
    }

    #[test]
    fn test_unstructured_fallback_renders_json() {
        let result = result_with(json!([{"name": "tokio", "stars": 25000}]));
        let answer = Verifier.verify_results("t", &result, &Plan::default()).final_answer;
        assert!(answer.contains("\"name\": \"tokio\""));
        assert!(answer.contains("25000"));
    }
}
