use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use common::types::Health;
use store::{Item, ItemStore};

use crate::errors::ApiError;
use crate::variant::Variant;

/// Shared request state: the collection plus the variant it serves.
#[derive(Clone)]
pub struct AppState {
    pub store: ItemStore,
    pub variant: Variant,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    let items = state.store.list().await;
    info!(count = items.len(), "list items");
    Json(items)
}

async fn get_item(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let key = state.variant.payload_key();
    let id = state
        .store
        .scheme()
        .parse_id(&raw)
        .map_err(|e| ApiError::from_store(e, key))?;
    let item = state
        .store
        .get(&id)
        .await
        .map_err(|e| ApiError::from_store(e, key))?;
    Ok(Json(item))
}

async fn create_item(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> (StatusCode, Json<Item>) {
    let item = state.store.create(fields).await;
    if let Some(id) = item.id() {
        info!(%id, "created item");
    }
    (StatusCode::CREATED, Json(item))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let key = state.variant.payload_key();
    let id = state
        .store
        .scheme()
        .parse_id(&raw)
        .map_err(|e| ApiError::from_store(e, key))?;
    let removed = state.store.remove(&id).await;
    info!(%id, removed, "delete item");
    // 200 with the same body whether or not anything matched
    Ok(Json(serde_json::json!({"message": "Item deleted"})))
}

/// Build the variant's application router. The read-only variant registers no
/// create/delete routes at all, so axum answers those methods with 405.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let items = if state.variant.mutable() {
        Router::new()
            .route("/items", get(list_items).post(create_item))
            .route("/items/:id", get(get_item).delete(delete_item))
    } else {
        Router::new()
            .route("/items", get(list_items))
            .route("/items/:id", get(get_item))
    };

    Router::new()
        .route("/health", get(health))
        .merge(items)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
