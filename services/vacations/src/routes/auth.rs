//! Registration and login

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::user::{AuthResponse, LoginRequest, NewUser, RegisterRequest, Role, User},
    password::{hash_password, verify_password},
    state::AppState,
    validation::{validate_login, validate_registration},
};

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    state.jwt_service.issue(user).map_err(|e| {
        error!("Failed to issue token for user {}: {}", user.id, e);
        ApiError::InternalServerError
    })
}

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let registration = validate_registration(payload).map_err(ApiError::Validation)?;

    let new_user = NewUser {
        first_name: registration.first_name,
        last_name: registration.last_name,
        email: registration.email,
        password_hash: hash_password(&registration.password)?,
        role: Role::User,
    };

    let user = match state.user_repository.create(&new_user).await {
        Ok(user) => user,
        Err(e) if e.is_unique_violation() => {
            info!("Registration refused, email already in use: {}", new_user.email);
            return Err(ApiError::validation("Email already in use"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = issue_token(&state, &user)?;
    info!("Registered user {}", user.id);

    Ok(Json(AuthResponse { user, token }))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let credentials = validate_login(payload).map_err(ApiError::Validation)?;

    let Some(stored) = state
        .user_repository
        .find_by_email(&credentials.email)
        .await?
    else {
        warn!("Login attempt for unknown email: {}", credentials.email);
        return Err(ApiError::AuthFailed);
    };

    if !verify_password(&credentials.password, &stored.password_hash) {
        warn!("Wrong password for user {}", stored.user.id);
        return Err(ApiError::AuthFailed);
    }

    let token = issue_token(&state, &stored.user)?;
    info!("User {} logged in", stored.user.id);

    Ok(Json(AuthResponse {
        user: stored.user,
        token,
    }))
}
