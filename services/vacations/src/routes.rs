//! Vacations service routes

use axum::{
    Json, Router,
    http::{
        HeaderName, HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    config::AppConfig,
    middleware::{USER_ID_HEADER, USER_ROLE_HEADER, admin_only, identity_middleware},
    state::AppState,
};

pub mod auth;
pub mod reports;
pub mod vacations;


/// Create the router for the vacations service
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let report_routes = Router::new()
        .route("/followers", get(reports::followers_report))
        .route("/followers.csv", get(reports::followers_report_csv))
        .route_layer(middleware::from_fn(admin_only));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/vacations",
            get(vacations::list_vacations).post(vacations::create_vacation),
        )
        .route(
            "/vacations/:id",
            put(vacations::update_vacation).delete(vacations::delete_vacation),
        )
        .route(
            "/vacations/:id/follow",
            post(vacations::follow_vacation).delete(vacations::unfollow_vacation),
        )
        .nest("/reports", report_routes)
        .nest_service("/images", ServeDir::new(&config.uploads_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured origins
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origin_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "vacations"
    }))
}
