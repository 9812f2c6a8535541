//! Interest handlers: tenant-side create/list/cancel and owner-side
//! review/approve/reject

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, is_unique_violation};
use crate::middleware::CurrentUser;
use crate::models::{CreateInterestRequest, Interest, InterestStatus};
use crate::state::AppState;

fn already_exists(interest: Interest) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Interest already exists",
            "interest": interest,
        })),
    )
        .into_response()
}

/// POST /api/interests
///
/// Idempotent create: a repeat submission for the same (tenant, house) pair
/// returns the existing record with 200 instead of erroring.
pub async fn create_interest(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateInterestRequest>,
) -> ApiResult<Response> {
    let house_id = payload
        .house_id
        .ok_or_else(|| ApiError::Validation("house_id is required".to_string()))?;

    let house = state
        .house_repository
        .find_by_id(house_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch house: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("House not found".to_string()))?;

    if house.owner_id == current.0.id {
        return Err(ApiError::Validation(
            "Owners cannot show interest on their own property".to_string(),
        ));
    }

    let existing = state
        .interest_repository
        .find_by_pair(house_id, current.0.id)
        .await
        .map_err(|e| {
            error!("Failed to check existing interest: {}", e);
            ApiError::Internal
        })?;

    if let Some(interest) = existing {
        return Ok(already_exists(interest));
    }

    let created = state
        .interest_repository
        .create(house_id, current.0.id, payload.message.as_deref())
        .await;

    let interest = match created {
        Ok(interest) => interest,
        // a concurrent submission won the race; return its row
        Err(e) if is_unique_violation(&e) => {
            let interest = state
                .interest_repository
                .find_by_pair(house_id, current.0.id)
                .await
                .map_err(|e| {
                    error!("Failed to refetch interest: {}", e);
                    ApiError::Internal
                })?
                .ok_or(ApiError::Internal)?;
            return Ok(already_exists(interest));
        }
        Err(e) => {
            error!("Failed to create interest: {}", e);
            return Err(ApiError::Internal);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Interest recorded",
            "interest": interest,
        })),
    )
        .into_response())
}

/// GET /api/interests/my-interests
pub async fn my_interests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let interests = state
        .interest_repository
        .list_by_tenant(current.0.id)
        .await
        .map_err(|e| {
            error!("Failed to list interests: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(json!({ "interests": interests })))
}

/// DELETE /api/interests/:id
pub async fn delete_interest(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .interest_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch interest: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("Interest not found".to_string()))?;

    if existing.tenant_id != current.0.id {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    state.interest_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete interest: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(json!({ "message": "Interest canceled" })))
}

/// GET /api/interests/owner
pub async fn owner_interests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let interests = state
        .interest_repository
        .list_by_owner(current.0.id)
        .await
        .map_err(|e| {
            error!("Failed to list incoming interests: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(json!({ "interests": interests })))
}

/// PATCH /api/interests/:id/approve
pub async fn approve_interest(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    resolve_interest(&state, &current, id, InterestStatus::Approved).await
}

/// PATCH /api/interests/:id/reject
pub async fn reject_interest(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    resolve_interest(&state, &current, id, InterestStatus::Rejected).await
}

/// Owner-only status transition; Pending is the only state that can move.
async fn resolve_interest(
    state: &AppState,
    current: &CurrentUser,
    id: Uuid,
    decision: InterestStatus,
) -> ApiResult<Json<serde_json::Value>> {
    let interest = state
        .interest_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch interest: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("Interest not found".to_string()))?;

    let house = state
        .house_repository
        .find_by_id(interest.house_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch house: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("House not found".to_string()))?;

    if house.owner_id != current.0.id {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let next = interest
        .status
        .transition(decision)
        .map_err(|_| ApiError::Conflict("Interest already resolved".to_string()))?;

    let interest = state
        .interest_repository
        .set_status(id, next)
        .await
        .map_err(|e| {
            error!("Failed to update interest status: {}", e);
            ApiError::Internal
        })?;

    let message = if next == InterestStatus::Approved {
        "Interest approved"
    } else {
        "Interest rejected"
    };

    Ok(Json(json!({
        "message": message,
        "interest": interest,
    })))
}
