//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    jwt::JwtService,
    repositories::{ReportRepository, UserRepository, VacationRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub vacation_repository: VacationRepository,
    pub report_repository: ReportRepository,
    pub jwt_service: JwtService,
    /// Honour `x-user-id`/`x-user-role` when no bearer token is sent
    pub allow_header_identity: bool,
}

impl AppState {
    /// Wire repositories over a pool
    pub fn new(db_pool: PgPool, jwt_service: JwtService, allow_header_identity: bool) -> Self {
        Self {
            user_repository: UserRepository::new(db_pool.clone()),
            vacation_repository: VacationRepository::new(db_pool.clone()),
            report_repository: ReportRepository::new(db_pool),
            jwt_service,
            allow_header_identity,
        }
    }
}
