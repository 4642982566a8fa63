//! Vacation listing, administration and follows

use axum::{
    Json, async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use common::error::DatabaseError;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    listing::{ListingQuery, VacationFilter, parse_page},
    middleware::{AdminUser, AuthenticatedUser, Principal},
    models::vacation::{ListParams, VacationPage, VacationPayload},
    state::AppState,
    validation::{StartDateRule, validate_vacation},
};

/// Vacation id taken from the path; must be a positive integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VacationId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for VacationId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;

        raw.trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(VacationId)
            .ok_or_else(|| ApiError::validation("Invalid id"))
    }
}

/// List vacations, one page at a time
pub async fn list_vacations(
    State(state): State<AppState>,
    principal: Principal,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let params = ListParams::from_pairs(pairs);
    let query = ListingQuery::new(
        parse_page(params.page.as_deref()),
        VacationFilter::parse(params.filter.as_deref()),
        &principal,
        Utc::now().date_naive(),
    );

    let (vacations, total) = state.vacation_repository.list(&query).await?;

    Ok(Json(VacationPage {
        vacations,
        total,
        page: query.page(),
        page_size: query.page_size(),
    }))
}

/// Create a vacation
pub async fn create_vacation(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Json(payload), _): WithRejection<Json<VacationPayload>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let vacation =
        validate_vacation(payload, StartDateRule::NotBefore(today)).map_err(ApiError::Validation)?;

    let id = state.vacation_repository.create(&vacation).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Vacation created",
            "id": id
        })),
    ))
}

/// Replace every field of a vacation; past start dates are accepted
pub async fn update_vacation(
    State(state): State<AppState>,
    _admin: AdminUser,
    VacationId(id): VacationId,
    WithRejection(Json(payload), _): WithRejection<Json<VacationPayload>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let vacation =
        validate_vacation(payload, StartDateRule::Unrestricted).map_err(ApiError::Validation)?;

    if !state.vacation_repository.update(id, &vacation).await? {
        return Err(ApiError::NotFound("Vacation not found".to_string()));
    }

    info!("Updated vacation {}", id);
    Ok(Json(json!({ "message": "Vacation updated" })))
}

/// Delete a vacation and its follows; deleting an unknown id succeeds
pub async fn delete_vacation(
    State(state): State<AppState>,
    _admin: AdminUser,
    VacationId(id): VacationId,
) -> ApiResult<impl IntoResponse> {
    if state.vacation_repository.delete(id).await? {
        info!("Deleted vacation {}", id);
    }

    Ok(Json(json!({ "message": "Vacation deleted" })))
}

/// Follow a vacation as the calling user
pub async fn follow_vacation(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    VacationId(vacation_id): VacationId,
) -> ApiResult<impl IntoResponse> {
    match state.vacation_repository.follow(user_id, vacation_id).await {
        Ok(_) => Ok(Json(json!({ "message": "Followed" }))),
        Err(e) => Err(follow_error(e)),
    }
}

/// Stop following a vacation; a missing follow is not an error
pub async fn unfollow_vacation(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    VacationId(vacation_id): VacationId,
) -> ApiResult<impl IntoResponse> {
    state
        .vacation_repository
        .unfollow(user_id, vacation_id)
        .await?;

    Ok(Json(json!({ "message": "Unfollowed" })))
}

/// Map a rejected follow insert onto the side that does not exist
fn follow_error(error: DatabaseError) -> ApiError {
    match error.violated_constraint() {
        Some("followers_vacation_id_fkey") => {
            return ApiError::NotFound("Vacation not found".to_string());
        }
        Some("followers_user_id_fkey") => return ApiError::Unauthenticated,
        _ => {}
    }

    error.into()
}
