#[cfg(test)]
mod connector_failure_tests {
    use std::{sync::Arc, time::Duration};

    use opsagent::{
        agent::{Executor, plan::Step},
        tools::{
            ConnectorRegistry, github::GithubConnector, news::NewsConnector, serp::SerpConnector,
            weather::WeatherConnector,
        },
    };

    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn executor() -> Executor {
        let timeout = Duration::from_secs(2);
        let registry = ConnectorRegistry::builder()
            .connector(
                WeatherConnector::new(None, timeout)
                    .unwrap()
                    .with_base_url(UNREACHABLE),
            )
            .connector(
                GithubConnector::new(None, timeout)
                    .unwrap()
                    .with_base_url(UNREACHABLE),
            )
            .connector(
                NewsConnector::new(None, timeout)
                    .unwrap()
                    .with_base_url(UNREACHABLE),
            )
            .connector(
                SerpConnector::new(None, timeout)
                    .unwrap()
                    .with_base_url(UNREACHABLE),
            )
            .build()
            .unwrap();
        Executor::new(Arc::new(registry))
    }

    async fn failure_of(step: Step) -> String {
        let outcome = executor().execute_step(&step).await;
        assert!(outcome.is_failure(), "expected a failure, got {outcome:?}");
        outcome.error().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_weather_transport_failure() {
        let error = failure_of(
            Step::new(1, "weather", "get_current_weather").with_param("city", "Paris"),
        )
        .await;
        assert!(error.starts_with("Weather API request failed: "), "{error}");
    }

    #[tokio::test]
    async fn test_github_transport_failure() {
        let error = failure_of(
            Step::new(1, "github", "search_repositories").with_param("query", "tokio"),
        )
        .await;
        assert!(error.starts_with("GitHub API request failed: "), "{error}");
    }

    #[tokio::test]
    async fn test_news_transport_failure() {
        let error =
            failure_of(Step::new(1, "news", "search_news").with_param("query", "rust")).await;
        assert!(error.starts_with("News API request failed: "), "{error}");
    }

    #[tokio::test]
    async fn test_serp_transport_failure() {
        let error = failure_of(Step::new(1, "serp", "search").with_param("query", "rust")).await;
        assert!(error.starts_with("SERP API request failed: "), "{error}");
    }

    #[tokio::test]
    async fn test_plan_keeps_running_after_transport_failures() {
        let plan = opsagent::agent::Plan::new(
            "Paris conditions",
            vec![
                Step::new(1, "weather", "get_current_weather").with_param("city", "Paris"),
                Step::new(2, "news", "search_news").with_param("query", "Paris"),
            ],
        );
        let result = executor().execute_plan(&plan).await;
        assert_eq!(result.steps_executed.len(), 2);
        assert_eq!(result.errors.len(), 2);
        assert!(result.final_data.is_none());
    }
}
