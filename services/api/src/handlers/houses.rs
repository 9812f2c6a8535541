//! House listing handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;
use crate::models::{
    CreateHouseRequest, HouseUpdate, ListingQuery, ListingStatus, NewHouse, Pagination,
    PropertyType, UpdateHouseRequest,
};
use crate::repositories::filter::{
    ListingFilter, OWNER_MAX_LIMIT, PUBLIC_MAX_LIMIT, PageParams, SortParams,
};
use crate::state::AppState;

fn parse_property_type(raw: &str) -> ApiResult<PropertyType> {
    raw.parse::<PropertyType>().map_err(|_| {
        ApiError::Validation(format!(
            "Invalid property_type. Must be one of: {}",
            PropertyType::VALID.join(", ")
        ))
    })
}

/// POST /api/houses/create
pub async fn create_house(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateHouseRequest>,
) -> ApiResult<impl IntoResponse> {
    let required = [
        &payload.title,
        &payload.address,
        &payload.city,
        &payload.state,
        &payload.zipcode,
        &payload.property_type,
    ];
    if required
        .iter()
        .any(|f| f.as_deref().map(str::trim).unwrap_or("").is_empty())
    {
        return Err(ApiError::Validation("Required fields missing".to_string()));
    }

    let property_type = parse_property_type(payload.property_type.as_deref().unwrap_or(""))?;

    let new_house = NewHouse {
        owner_id: current.0.id,
        title: payload.title.unwrap_or_default().trim().to_string(),
        description: payload.description,
        address: payload.address.unwrap_or_default().trim().to_string(),
        city: payload.city.unwrap_or_default().trim().to_string(),
        state: payload.state.unwrap_or_default().trim().to_string(),
        zipcode: payload.zipcode.unwrap_or_default().trim().to_string(),
        property_type,
        bedrooms: payload.bedrooms.unwrap_or(0),
        bathrooms: payload.bathrooms.unwrap_or(0),
        area_sqft: payload.area_sqft.unwrap_or(0),
        rent: payload.rent,
        available_from: payload.available_from,
        amenities: payload.amenities.map(|a| a.into_vec()).unwrap_or_default(),
    };

    let house = state
        .house_repository
        .create(&new_house)
        .await
        .map_err(|e| {
            error!("Failed to create house: {}", e);
            ApiError::Internal
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "House created successfully",
            "house": house,
        })),
    ))
}

/// GET /api/houses
pub async fn list_houses(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = ListingFilter::public(&query);
    let sort = SortParams::resolve(query.sort.as_deref(), query.order.as_deref());
    let page = PageParams::resolve(query.page.as_deref(), query.limit.as_deref(), PUBLIC_MAX_LIMIT);

    let (houses, total) = state
        .house_repository
        .list_public(&filter, sort, page)
        .await
        .map_err(|e| {
            error!("Failed to list houses: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(json!({
        "houses": houses,
        "pagination": Pagination::new(total, page.page, page.limit),
    })))
}

/// GET /api/houses/my-properties
pub async fn my_properties(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListingQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = ListingFilter::owner(&query, current.0.id);
    let sort = SortParams::resolve(query.sort.as_deref(), query.order.as_deref());
    let page = PageParams::resolve(query.page.as_deref(), query.limit.as_deref(), OWNER_MAX_LIMIT);

    let (houses, total) = state
        .house_repository
        .list_by_owner(&filter, sort, page)
        .await
        .map_err(|e| {
            error!("Failed to list owner houses: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(json!({
        "houses": houses,
        "pagination": Pagination::new(total, page.page, page.limit),
    })))
}

/// GET /api/houses/:id
pub async fn get_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let house = state
        .house_repository
        .find_with_owner(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch house: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("House not found".to_string()))?;

    Ok(Json(json!({ "house": house })))
}

/// PUT /api/houses/:id
pub async fn update_house(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHouseRequest>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .house_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch house: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("House not found".to_string()))?;

    if existing.owner_id != current.0.id {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let property_type = payload
        .property_type
        .as_deref()
        .map(parse_property_type)
        .transpose()?;

    let status = payload
        .status
        .as_deref()
        .map(|raw| {
            raw.parse::<ListingStatus>().map_err(|_| {
                ApiError::Validation("Invalid status. Must be one of: ForSale, Sold".to_string())
            })
        })
        .transpose()?;

    let update = HouseUpdate {
        title: payload.title,
        description: payload.description,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zipcode: payload.zipcode,
        property_type,
        bedrooms: payload.bedrooms,
        bathrooms: payload.bathrooms,
        area_sqft: payload.area_sqft,
        rent: payload.rent,
        available_from: payload.available_from,
        amenities: payload.amenities.map(|a| a.into_vec()),
        status,
    };

    if update.is_empty() {
        return Err(ApiError::Validation(
            "No valid fields provided for update".to_string(),
        ));
    }

    let house = state
        .house_repository
        .update(id, &update)
        .await
        .map_err(|e| {
            error!("Failed to update house: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(json!({
        "message": "House updated",
        "house": house,
    })))
}

/// DELETE /api/houses/:id
pub async fn delete_house(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .house_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch house: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("House not found".to_string()))?;

    if existing.owner_id != current.0.id {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    state.house_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete house: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(json!({ "message": "House deleted successfully" })))
}
