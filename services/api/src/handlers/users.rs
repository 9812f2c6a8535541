//! User registration, login, and profile handlers

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;

use crate::error::{ApiError, ApiResult, is_unique_violation};
use crate::middleware::CurrentUser;
use crate::models::{
    LoginRequest, NewUser, ProfileResponse, ProfileUpdate, RegisterRequest, Role,
    UpdateProfileRequest, UserResponse,
};
use crate::state::AppState;
use crate::validation::{validate_email, validate_name, validate_password, validate_username};

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(name), Some(username), Some(email), Some(password), Some(confirm_password)) = (
        payload.name,
        payload.username,
        payload.email,
        payload.password,
        payload.confirm_password,
    ) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    let name = name.trim().to_string();
    let username = username.trim().to_lowercase();
    let email = email.trim().to_lowercase();

    if password != confirm_password {
        return Err(ApiError::Validation("Passwords do not match".to_string()));
    }

    validate_password(&password).map_err(ApiError::Validation)?;
    validate_email(&email).map_err(ApiError::Validation)?;
    validate_username(&username).map_err(ApiError::Validation)?;
    validate_name(&name).map_err(ApiError::Validation)?;

    let role = match payload.role.as_deref().map(str::trim) {
        None | Some("") => Role::Tenant,
        Some(raw) => raw.parse::<Role>().map_err(|_| {
            ApiError::Validation("Invalid role. Must be one of: Owner, Tenant".to_string())
        })?,
    };

    let exists = state
        .user_repository
        .identity_exists(&email, &username)
        .await
        .map_err(|e| {
            error!("Registration lookup failed: {}", e);
            ApiError::Internal
        })?;

    if exists {
        return Err(ApiError::Conflict(
            "Email or Username already exists".to_string(),
        ));
    }

    let new_user = NewUser {
        name,
        username,
        email,
        password,
        role,
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        // two concurrent registrations can race past the existence check;
        // the unique index reports the loser
        if is_unique_violation(&e) {
            ApiError::Conflict("Email or Username already exists".to_string())
        } else {
            error!("Failed to create user: {}", e);
            ApiError::Internal
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": UserResponse::from(&user),
        })),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let identifier = payload
        .email
        .as_deref()
        .or(payload.username.as_deref())
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let (Some(identifier), Some(password)) = (identifier, payload.password) else {
        return Err(ApiError::Validation(
            "Email/Username and Password are required".to_string(),
        ));
    };

    let user = state
        .user_repository
        .find_by_identifier(&identifier)
        .await
        .map_err(|e| {
            error!("Login lookup failed: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let matches = state
        .user_repository
        .verify_password(&user, &password)
        .await
        .map_err(|e| {
            error!("Password verification failed: {}", e);
            ApiError::Internal
        })?;

    if !matches {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": UserResponse::from(&user),
    })))
}

/// POST /api/users/logout
///
/// Sessions are stateless bearer tokens; logout only acknowledges that the
/// client presented one.
pub async fn logout(headers: HeaderMap) -> ApiResult<impl IntoResponse> {
    let has_token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .map(|header| header.starts_with("Bearer "))
        .unwrap_or(false);

    if !has_token {
        return Err(ApiError::Validation("No token provided".to_string()));
    }

    Ok(Json(json!({ "message": "Logout successful" })))
}

/// GET /api/users/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "message": "User fetched successfully",
        "user": ProfileResponse::from(current.0),
    })))
}

/// PUT /api/users/update
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.has_immutable_fields() {
        return Err(ApiError::Validation(
            "Email, password, and role cannot be updated".to_string(),
        ));
    }

    let name = match payload.name {
        Some(name) => {
            let name = name.trim().to_string();
            validate_name(&name).map_err(ApiError::Validation)?;
            Some(name)
        }
        None => None,
    };

    let username = match payload.username {
        Some(username) => {
            let username = username.trim().to_lowercase();
            validate_username(&username).map_err(ApiError::Validation)?;
            Some(username)
        }
        None => None,
    };

    let update = ProfileUpdate {
        name,
        username,
        age: payload.age,
        gender: payload.gender,
        city: payload.city,
        experience: payload.experience,
        organization: payload.organization,
        about_org: payload.about_org,
        skills: payload.skills,
        portfolio_url: payload.portfolio_url,
    };

    if update.is_empty() {
        return Err(ApiError::Validation(
            "Provide at least one field to update".to_string(),
        ));
    }

    if let Some(username) = &update.username {
        let taken = state
            .user_repository
            .username_taken(username, current.0.id)
            .await
            .map_err(|e| {
                error!("Username lookup failed: {}", e);
                ApiError::Internal
            })?;

        if taken {
            return Err(ApiError::Conflict("Username already taken".to_string()));
        }
    }

    let user = state
        .user_repository
        .update_profile(current.0.id, &update)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Username already taken".to_string())
            } else {
                error!("Failed to update profile: {}", e);
                ApiError::Internal
            }
        })?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": ProfileResponse::from(user),
    })))
}
