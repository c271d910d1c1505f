//! Greeting service
//!
//! A tiny HTTP service whose tests show the two ways of using `expect`:
//! comparing a returned value directly, and decoding a response body
//! against an expected value with `stream_equal`.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Environment variable holding the listen address
pub const ADDR_VAR: &str = "EXPECT_GREETING_ADDR";

/// Listen address used when `EXPECT_GREETING_ADDR` is unset
pub const DEFAULT_ADDR: &str = "[::]:8080";

/// Name greeted by `GET /`
pub const DEFAULT_NAME: &str = "Picard";

/// Response body of the greeting endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeting {
    pub greeting: String,
}

/// Build the greeting for `name`
pub fn greeting(name: &str) -> String {
    format!("Hello, {}", name)
}

/// Create the service router
pub fn router() -> Router {
    Router::new()
        .route("/", get(greet_default))
        .route("/:name", get(greet_name))
}

/// Start the service
pub async fn serve(addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("server started on {}", addr);
    axum::serve(listener, router()).await
}

/// GET / - Greets the default name
async fn greet_default() -> Json<Greeting> {
    Json(Greeting {
        greeting: greeting(DEFAULT_NAME),
    })
}

/// GET /:name - Greets the given name
async fn greet_name(Path(name): Path<String>) -> Json<Greeting> {
    Json(Greeting {
        greeting: greeting(&name),
    })
}
