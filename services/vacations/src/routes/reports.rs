//! Followers report, as JSON and as a CSV download

use axum::{
    Json,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};

use crate::{
    error::ApiResult,
    models::report::{CSV_FILE_NAME, render_csv},
    state::AppState,
};

/// Follower count per vacation, ordered by destination
pub async fn followers_report(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let rows = state.report_repository.followers_report().await?;
    Ok(Json(rows))
}

/// Same rows as [`followers_report`], rendered as an attached CSV file
pub async fn followers_report_csv(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let rows = state.report_repository.followers_report().await?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        render_csv(&rows),
    ))
}
