//! HTTP endpoint for Cinevec similarity search.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use cinevec_index::search::{SearchHit, DEFAULT_TOP_K};
use cinevec_index::{SearchAssets, SearchError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Hard startup dependency: no listener until the assets are in memory.
    let assets = SearchAssets::load()?;
    let app = app(Arc::new(assets));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8008));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// Define the health check response struct
#[derive(Serialize)]
struct HealthStatus {
    status: String,
}

// Define the health check handler
async fn health_check() -> impl IntoResponse {
    let health = HealthStatus {
        status: "ok".to_string(),
    };
    (StatusCode::OK, Json(health))
}

#[derive(Deserialize)]
struct SearchRequest {
    vector: Vec<f32>,
    #[serde(rename = "topK", default = "default_top_k")]
    top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

/// Search faults mapped onto HTTP statuses: client input faults become 400,
/// configuration and asset faults 500. The body shape `{"detail": ...}`
/// matches what existing clients already parse.
struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_fault() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "search failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = Json(serde_json::json!({ "detail": self.0.to_string() }));
        (status, body).into_response()
    }
}

async fn search(
    State(assets): State<Arc<SearchAssets>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = assets.search(&req.vector, req.top_k)?;
    Ok(Json(SearchResponse { results }))
}

// Separate function to create the Axum app (makes testing easier)
fn app(assets: Arc<SearchAssets>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/search", post(search))
        .layer(TraceLayer::new_for_http())
        .with_state(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use usearch::ffi::{IndexOptions, MetricKind, ScalarKind};
    use usearch::Index;

    fn write_assets(dir: &Path) {
        let options = IndexOptions {
            dimensions: 2,
            metric: MetricKind::IP,
            quantization: ScalarKind::F32,
            ..Default::default()
        };
        let index = Index::new(&options).unwrap();
        index.reserve(3).unwrap();
        index.add(0, &[1.0, 0.0]).unwrap();
        index.add(1, &[0.0, 1.0]).unwrap();
        index.add(2, &[0.6, 0.8]).unwrap();
        index
            .save(dir.join("faiss.index").to_string_lossy().as_ref())
            .unwrap();

        let meta = serde_json::json!({
            "dim": 2,
            "items": [
                {"imdbId": "tt0000001", "id": 1, "title": "First", "year": 1999,
                 "genre": "Drama", "productionCountry": "US",
                 "keywords": ["a"], "moodTags": ["calm"]},
                {"title": "Second"},
                {"title": "Third"}
            ]
        });
        fs::write(dir.join("meta.json"), meta.to_string()).unwrap();
    }

    fn test_app(dir: &Path) -> Router {
        write_assets(dir);
        app(Arc::new(SearchAssets::load_from(dir).unwrap()))
    }

    async fn post_search(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/search")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body_json, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_search_returns_ranked_results() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());

        let (status, body) =
            post_search(app, serde_json::json!({"vector": [1.0, 0.0], "topK": 2})).await;
        assert_eq!(status, StatusCode::OK);

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["title"], "First");
        assert_eq!(results[0]["imdbId"], "tt0000001");
        assert_eq!(results[0]["year"], 1999);
        assert!((results[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-4);

        for r in results {
            assert_eq!(r["score"], r["similarity"]);
        }
        assert!(results[0]["score"].as_f64().unwrap() >= results[1]["score"].as_f64().unwrap());
    }

    #[tokio::test]
    async fn test_search_defaults_top_k_and_nulls_missing_fields() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());

        let (status, body) = post_search(app, serde_json::json!({"vector": [0.0, 1.0]})).await;
        assert_eq!(status, StatusCode::OK);

        // Default topK is 50, clamped to the 3-item catalog.
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);

        let second = results.iter().find(|r| r["title"] == "Second").unwrap();
        assert!(second["imdbId"].is_null());
        assert!(second["genre"].is_null());
        assert!(second["moodTags"].is_null());
    }

    #[tokio::test]
    async fn test_search_rejects_wrong_vector_length() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());

        let (status, body) =
            post_search(app, serde_json::json!({"vector": [1.0, 0.0, 3.0]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "vector must have length 2, got 3");
    }

    #[tokio::test]
    async fn test_search_rejects_zero_vector() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());

        let (status, body) = post_search(app, serde_json::json!({"vector": [0.0, 0.0]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "vector norm is 0");
    }

    #[tokio::test]
    async fn test_search_rejects_out_of_range_top_k() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());

        let (status, body) =
            post_search(app, serde_json::json!({"vector": [1.0, 0.0], "topK": 500})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "topK must be between 1 and 200");
    }
}
