use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{Result, TripError},
    server::AppState,
    types::{CallerIdentity, TripRecord, TripRequestPayload},
};

const TRIP_NOT_FOUND: &str = "Trip not found";
const TRIP_ACCESS_DENIED: &str = "Trip not found or access denied";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn generate_trip(
    State(state): State<AppState>,
    identity: CallerIdentity,
    payload: std::result::Result<Json<TripRequestPayload>, JsonRejection>,
) -> Result<Json<TripRecord>> {
    let Json(payload) = payload.map_err(|rejection| TripError::Validation(rejection.body_text()))?;
    let request = payload.validate()?;

    info!(user = %identity.email, destination = %request.destination, "generating trip");
    let trip = state.planner.plan_trip(&request).await?;

    let user = state.store.upsert_user(&identity).await?;
    let record = state.store.create_trip(user.id, &trip).await?;

    info!(trip_id = %record.id, user = %identity.email, "trip saved");
    Ok(Json(record))
}

pub async fn list_trips(
    State(state): State<AppState>,
    identity: CallerIdentity,
) -> Result<Json<Vec<TripRecord>>> {
    state
        .store
        .list_trips_for_user(&identity.email)
        .await?
        .map(Json)
        .ok_or_else(|| TripError::NotFound("User not found".to_string()))
}

pub async fn get_trip(
    State(state): State<AppState>,
    _identity: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<TripRecord>> {
    let not_found = || TripError::NotFound(TRIP_NOT_FOUND.to_string());
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;

    state.store.get_trip(id).await?.map(Json).ok_or_else(not_found)
}

/// Owner-only delete. The ownership check and the delete are separate
/// store calls, so two concurrent deletes may both pass the check.
pub async fn delete_trip(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let denied = || TripError::Forbidden(TRIP_ACCESS_DENIED.to_string());
    let id = Uuid::parse_str(&id).map_err(|_| denied())?;

    match state.store.get_trip_with_owner(id).await? {
        Some((_, owner)) if owner.email == identity.email => {}
        _ => return Err(denied()),
    }

    state.store.delete_trip(id).await?;
    info!(trip_id = %id, user = %identity.email, "trip deleted");
    Ok(Json(json!({ "message": "Trip deleted successfully" })))
}
