use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use pixly_core::{
    validate, ImageFilter, ImagePatch, ImageStore, NewImage, PixlyError, Schema, Stash,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
struct RestletteState {
    store: Arc<dyn ImageStore>,
}

/// Routes for one image collection mounted at `path`:
///
/// - `GET    {path}`     → `{ images: [...] }`, filtered by query string
/// - `POST   {path}`     → `201 { image }`
/// - `GET    {path}/:id` → `{ image }`
/// - `PATCH  {path}/:id` → `{ image }`
/// - `DELETE {path}/:id` → `{ deleted: id }`
pub fn build_restlette_router(path: &str, store: Arc<dyn ImageStore>) -> Router {
    let state = RestletteState { store };
    let item_path = format!("{}/:id", path.trim_end_matches('/'));

    Router::new()
        .route(path, post(create_handler).get(list_handler))
        .route(
            &item_path,
            get(read_handler).patch(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

/// Validate a raw payload against `schema`, then decode it.
fn parse_payload<T: DeserializeOwned>(schema: Schema, payload: Stash) -> Result<T, ApiError> {
    validate(schema, &payload).map_err(PixlyError::Validation)?;
    serde_json::from_value(Value::Object(payload))
        .map_err(|e| ApiError(PixlyError::BadRequest(e.to_string())))
}

fn json_body(body: Result<Json<Stash>, JsonRejection>) -> Result<Stash, ApiError> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| ApiError(PixlyError::BadRequest(rejection.body_text())))
}

/// Ids that don't parse can't name a stored image.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError(PixlyError::image_not_found()))
}

async fn create_handler(
    State(state): State<RestletteState>,
    body: Result<Json<Stash>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let new_image: NewImage = parse_payload(Schema::ImageNew, json_body(body)?)?;
    let image = state.store.add(new_image).await?;
    Ok((StatusCode::CREATED, Json(json!({ "image": image }))))
}

async fn list_handler(
    State(state): State<RestletteState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) =
        query.map_err(|rejection| ApiError(PixlyError::BadRequest(rejection.body_text())))?;
    let payload: Stash = params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let filter: ImageFilter = parse_payload(Schema::ImageSearch, payload)?;
    let images = state.store.find_all(&filter).await?;
    Ok(Json(json!({ "images": images })))
}

async fn read_handler(
    State(state): State<RestletteState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state.store.get(parse_id(&id)?).await?;
    Ok(Json(json!({ "image": image })))
}

async fn update_handler(
    State(state): State<RestletteState>,
    Path(id): Path<String>,
    body: Result<Json<Stash>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let patch: ImagePatch = parse_payload(Schema::ImageUpdate, json_body(body)?)?;
    let image = state.store.update(parse_id(&id)?, &patch).await?;
    Ok(Json(json!({ "image": image })))
}

async fn delete_handler(
    State(state): State<RestletteState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.remove(parse_id(&id)?).await?;
    Ok(Json(json!({ "deleted": id })))
}
