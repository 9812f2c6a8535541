//! Route tables binding verbs and paths to middleware chains and handlers

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};

use crate::handlers::{houses, interests, users};
use crate::middleware::{auth_middleware, require_owner};
use crate::state::AppState;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    // authenticated + owner role
    let owner_routes = Router::new()
        .route("/api/houses/create", post(houses::create_house))
        .route("/api/houses/my-properties", get(houses::my_properties))
        .route("/api/houses/:id", put(houses::update_house))
        .route("/api/houses/:id", delete(houses::delete_house))
        .route("/api/interests/owner", get(interests::owner_interests))
        .route(
            "/api/interests/:id/approve",
            patch(interests::approve_interest),
        )
        .route(
            "/api/interests/:id/reject",
            patch(interests::reject_interest),
        )
        .route_layer(middleware::from_fn(require_owner))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // authenticated, any role
    let auth_routes = Router::new()
        .route("/api/users/me", get(users::me))
        .route("/api/users/update", put(users::update_profile))
        .route("/api/interests", post(interests::create_interest))
        .route("/api/interests/my-interests", get(interests::my_interests))
        .route("/api/interests/:id", delete(interests::delete_interest))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/users/logout", post(users::logout))
        .route("/api/houses", get(houses::list_houses))
        .route("/api/houses/:id", get(houses::get_house))
        .merge(auth_routes)
        .merge(owner_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rently-api"
    }))
}
