//! Service identification endpoint

use axum::Json;

pub const SERVICE_NAME: &str = "Annotator Store API";

pub async fn root() -> Json<&'static str> {
    Json(SERVICE_NAME)
}
