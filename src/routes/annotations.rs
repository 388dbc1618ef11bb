//! Annotation API endpoints
//!
//! CRUD over annotations. Handlers only shape payloads and sequence the
//! authorization and storage calls; both are delegated through `AppState`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde_json::{Map, Value};

use crate::annotations::{filter_input, Annotation, CREATE_FILTER_FIELDS, UPDATE_FILTER_FIELDS};
use crate::auth::{Action, CallerIdentity};
use crate::error::{AppError, Result};
use crate::middleware::is_json;
use crate::state::AppState;
use crate::store::SearchQuery;

/// List annotations with the store's default paging
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Annotation>>> {
    let annotations = state.store().search(&SearchQuery::new()).await?;
    Ok(Json(annotations))
}

/// Create a new annotation owned by the caller
pub async fn create_annotation(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Annotation>> {
    let Some(identity) = caller.user() else {
        return Err(AppError::unauthorized("create annotation", &caller));
    };

    let Some(fields) = json_payload(&headers, &body)? else {
        return Err(AppError::BadRequest(
            "No JSON payload sent. Annotation not created.".to_string(),
        ));
    };

    let mut fields = filter_input(fields, CREATE_FILTER_FIELDS);
    // Ids come from the store, never from the client
    fields.remove("id");

    let mut annotation = Annotation::from_map(fields);
    annotation.set_consumer(identity.consumer.key.as_str());
    if annotation.owner_id().as_deref() != Some(identity.id.as_str()) {
        annotation.set_user(identity.id.as_str());
    }

    state.store().save(&mut annotation).await?;

    if state.hooks().after_create(&mut annotation) {
        state.store().save(&mut annotation).await?;
    }

    tracing::info!(
        id = annotation.id().unwrap_or_default(),
        user = %identity.id,
        "Created annotation"
    );
    Ok(Json(annotation))
}

/// Get a single annotation
pub async fn read_annotation(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Annotation>> {
    let annotation = state
        .store()
        .fetch(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Annotation not found!".to_string()))?;

    check_action(&state, &annotation, Action::Read, &caller, "")?;

    Ok(Json(annotation))
}

/// Update an annotation
///
/// Without a JSON body this is a no-op that returns the stored annotation.
pub async fn update_annotation(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Annotation>> {
    let mut annotation = state.store().fetch(&id).await?.ok_or_else(|| {
        AppError::NotFound("Annotation not found! No update performed.".to_string())
    })?;

    check_action(&state, &annotation, Action::Update, &caller, "")?;

    if let Some(fields) = json_payload(&headers, &body)? {
        let mut changes = filter_input(fields, UPDATE_FILTER_FIELDS);
        changes.insert("id".to_string(), Value::String(id.clone()));

        if let Some(permissions) = changes.get("permissions") {
            if *permissions != annotation.permissions() {
                check_action(
                    &state,
                    &annotation,
                    Action::Admin,
                    &caller,
                    "permissions update",
                )?;
            }
        }

        annotation.merge(changes);
        state.hooks().before_update(&mut annotation);
        state.store().save(&mut annotation).await?;

        tracing::info!(id = %id, "Updated annotation");
    }

    Ok(Json(annotation))
}

/// Delete an annotation
pub async fn delete_annotation(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let annotation = state.store().fetch(&id).await?.ok_or_else(|| {
        AppError::NotFound("Annotation not found. No delete performed.".to_string())
    })?;

    check_action(&state, &annotation, Action::Delete, &caller, "")?;

    state.store().delete(&annotation).await?;
    tracing::info!(id = %id, "Deleted annotation");

    Ok(StatusCode::NO_CONTENT)
}

fn check_action(
    state: &AppState,
    annotation: &Annotation,
    action: Action,
    caller: &CallerIdentity,
    context: &str,
) -> Result<()> {
    if state.authorizer().authorize(annotation, action, caller.user()) {
        Ok(())
    } else {
        tracing::warn!(
            id = annotation.id().unwrap_or_default(),
            %action,
            "Authorization denied"
        );
        Err(AppError::unauthorized(context, caller))
    }
}

/// The request body as a JSON object, if one was sent
///
/// Bodies without a JSON content type are ignored, as are empty bodies and
/// falsy JSON values (`null`, `false`, `0`, `""`, `[]`, `{}`). Malformed JSON
/// and non-object values are rejected.
fn json_payload(headers: &HeaderMap, body: &Bytes) -> Result<Option<Map<String, Value>>> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed JSON payload: {}", e)))?;

    match value {
        Value::Object(fields) if fields.is_empty() => Ok(None),
        Value::Object(fields) => Ok(Some(fields)),
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(ref n) if n.as_f64() == Some(0.0) => Ok(None),
        Value::String(ref s) if s.is_empty() => Ok(None),
        Value::Array(ref items) if items.is_empty() => Ok(None),
        _ => Err(AppError::BadRequest(
            "JSON payload must be an object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::CONTENT_TYPE, HeaderValue};

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn payload(body: &'static str) -> Result<Option<Map<String, Value>>> {
        json_payload(&json_headers(), &Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn test_json_payload_object() {
        let fields = payload(r#"{"text": "hi"}"#).unwrap().unwrap();
        assert_eq!(fields.get("text"), Some(&Value::from("hi")));
    }

    #[test]
    fn test_json_payload_falsy_values_are_absent() {
        for body in ["", "  ", "null", "false", "0", "0.0", "\"\"", "[]", "{}"] {
            assert!(payload(body).unwrap().is_none(), "body {:?}", body);
        }
    }

    #[test]
    fn test_json_payload_rejects_bad_input() {
        assert!(matches!(payload("{nope"), Err(AppError::BadRequest(_))));
        assert!(matches!(payload("[1, 2]"), Err(AppError::BadRequest(_))));
        assert!(matches!(payload("true"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_json_payload_requires_json_content_type() {
        let body = Bytes::from_static(br#"{"text": "hi"}"#);
        assert!(json_payload(&HeaderMap::new(), &body).unwrap().is_none());
    }
}
