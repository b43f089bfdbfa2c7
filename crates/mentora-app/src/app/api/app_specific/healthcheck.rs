use salvo::prelude::Json;
use salvo::{Router, handler};
use serde_json::{Value, json};

#[handler]
async fn healthcheck() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("healthcheck").get(healthcheck)
}
