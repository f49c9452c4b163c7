//! Test helpers: a local stand-in for the remote catalog

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Recorded = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// A fake catalog listening on an ephemeral local port.
///
/// Query `fail` answers 500, `garbage` answers a non-JSON body, `empty`
/// answers no items; anything else returns two "Dune" volumes.
pub struct FakeCatalog {
    pub url: String,
    recorded: Recorded,
}

impl FakeCatalog {
    /// Query parameters of every request received so far
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.recorded.lock().unwrap().clone()
    }
}

pub async fn spawn_fake_catalog() -> FakeCatalog {
    let recorded: Recorded = Arc::default();
    let app = Router::new()
        .route("/volumes", get(volumes))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeCatalog {
        url: format!("http://{}/volumes", addr),
        recorded,
    }
}

async fn volumes(
    State(recorded): State<Recorded>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    recorded.lock().unwrap().push(params);

    match q.as_str() {
        "fail" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbage" => "<html>not json</html>".into_response(),
        "empty" => Json(serde_json::json!({"kind": "books#volumes", "totalItems": 0}))
            .into_response(),
        _ => Json(serde_json::json!({
            "items": [
                {"volumeInfo": {
                    "title": "Dune",
                    "authors": ["Frank Herbert"],
                    "description": "Spice & sand",
                    "imageLinks": {"thumbnail": "http://img.example/dune.jpg"}
                }},
                {"volumeInfo": {"title": "Dune Messiah"}}
            ]
        }))
        .into_response(),
    }
}
