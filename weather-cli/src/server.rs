//! HTTP front end: `GET /weather/{city}` answered by the aggregator.

use std::{sync::Arc, time::Instant};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use tracing::{error, info};
use weather_core::{Aggregator, TemperatureReport};

const INDEX_HTML: &str = r#"<html>
<form action="/weather/Chisinau" method="get" id="form1">
</form>

<button type="submit" form="form1" value="Submit">Submit</button>
</html>
"#;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

/// GET /weather/{city}
async fn weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<TemperatureReport>, (StatusCode, String)> {
    let begin = Instant::now();

    let temp = state.aggregator.temperature(&city).await.map_err(|e| {
        error!(%city, error = %e, "aggregation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(TemperatureReport { city, temp, took: format!("{:?}", begin.elapsed()) }))
}

/// GET / and GET /form
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn hello() -> &'static str {
    "hello"
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}

/// Create the HTTP router
pub fn create_router(aggregator: Arc<Aggregator>) -> Router {
    let state = AppState { aggregator };

    Router::new()
        .route("/", get(index))
        .route("/form", get(index))
        .route("/hello", get(hello))
        .route("/weather/{city}", get(weather))
        .fallback(not_found)
        .with_state(state)
}

/// Run the HTTP server until the process is stopped.
pub async fn run_http_server(aggregator: Arc<Aggregator>, addr: &str) -> anyhow::Result<()> {
    let app = create_router(aggregator);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;
    use weather_core::TemperatureProvider;

    #[derive(Debug)]
    struct Fixed(f64);

    #[async_trait]
    impl TemperatureProvider for Fixed {
        async fn temperature(&self, _city: &str) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    #[derive(Debug)]
    struct Broken;

    #[async_trait]
    impl TemperatureProvider for Broken {
        async fn temperature(&self, _city: &str) -> anyhow::Result<f64> {
            Err(anyhow::anyhow!("upstream unavailable"))
        }
    }

    fn router(providers: Vec<Arc<dyn TemperatureProvider>>) -> Router {
        create_router(Arc::new(Aggregator::new(providers)))
    }

    async fn get_path(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn weather_returns_report_json() {
        let app = router(vec![Arc::new(Fixed(10.0)), Arc::new(Fixed(20.0))]);

        let (status, body) = get_path(app, "/weather/Chisinau").await;
        assert_eq!(status, StatusCode::OK);

        let report: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(report["city"], "Chisinau");
        assert_eq!(report["temp"], 15.0);
        assert!(report["took"].is_string());
    }

    #[tokio::test]
    async fn weather_decodes_city_from_path() {
        let app = router(vec![Arc::new(Fixed(21.0))]);

        let (status, body) = get_path(app, "/weather/New%20York").await;
        assert_eq!(status, StatusCode::OK);

        let report: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(report["city"], "New York");
    }

    #[tokio::test]
    async fn weather_reports_provider_error_as_500() {
        let app = router(vec![Arc::new(Fixed(10.0)), Arc::new(Broken)]);

        let (status, body) = get_path(app, "/weather/Chisinau").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "upstream unavailable");
    }

    #[tokio::test]
    async fn weather_without_providers_is_500() {
        let app = router(Vec::new());

        let (status, body) = get_path(app, "/weather/Chisinau").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("No weather providers configured"));
    }

    #[tokio::test]
    async fn hello_and_index_routes() {
        let (status, body) = get_path(router(Vec::new()), "/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hello");

        let (status, body) = get_path(router(Vec::new()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/weather/Chisinau"));

        let (status, _) = get_path(router(Vec::new()), "/form").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let (status, body) = get_path(router(Vec::new()), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "not found");
    }
}
