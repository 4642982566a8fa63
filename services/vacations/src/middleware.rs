//! Identity resolution and the authorization gate
//!
//! Every request passes through [`identity_middleware`], which resolves a
//! [`Principal`] and stores it in the request extensions. Handlers then state
//! what they need through extractors: [`Principal`] for optional identity,
//! [`AuthenticatedUser`] when a user id is required and [`AdminUser`] when the
//! caller must be an admin. Whole routers can be closed to non-admins with
//! [`admin_only`].

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use std::convert::Infallible;
use tracing::warn;

use crate::{error::ApiError, jwt::JwtService, models::user::Role, state::AppState};

/// Header carrying the caller's asserted user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's asserted role
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Resolved identity of the caller for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Principal {
    pub id: Option<i64>,
    pub role: Role,
}

impl Principal {
    /// Caller with no identity
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Principal from an unverified id/role assertion.
    ///
    /// The role is admin only for the exact literal `admin`; the id is kept
    /// only when it parses as an integer.
    pub fn from_assertion(user_id: Option<&str>, role: Option<&str>) -> Self {
        Principal {
            id: user_id.and_then(|raw| raw.trim().parse::<i64>().ok()),
            role: match role {
                Some("admin") => Role::Admin,
                _ => Role::User,
            },
        }
    }

    /// User id usable for per-user queries; zero counts as absent
    pub fn user_id(&self) -> Option<i64> {
        self.id.filter(|id| *id != 0)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Fails with `Unauthenticated` unless the principal carries a non-zero id
pub fn require_authenticated(principal: &Principal) -> Result<i64, ApiError> {
    principal.user_id().ok_or(ApiError::Unauthenticated)
}

/// Fails with `Forbidden` unless the principal is an admin
pub fn require_admin(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Resolve the caller from request headers.
///
/// A bearer token, when present, is authoritative. Otherwise the
/// `x-user-id`/`x-user-role` assertion is used if `allow_header_identity`
/// is set.
pub fn resolve_principal(
    headers: &HeaderMap,
    jwt_service: &JwtService,
    allow_header_identity: bool,
) -> Principal {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return match jwt_service.validate(bearer.token()) {
            Ok(claims) => claims.principal(),
            Err(e) => {
                warn!("Rejected bearer token, treating caller as anonymous: {}", e);
                Principal::anonymous()
            }
        };
    }

    if !allow_header_identity {
        return Principal::anonymous();
    }

    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    Principal::from_assertion(header(USER_ID_HEADER), header(USER_ROLE_HEADER))
}

/// Attach the resolved [`Principal`] to the request
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let principal = resolve_principal(
        req.headers(),
        &state.jwt_service,
        state.allow_header_identity,
    );
    req.extensions_mut().insert(principal);

    next.run(req).await
}

/// Reject non-admin callers before the handler runs
pub async fn admin_only(
    principal: Principal,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    require_admin(&principal)?;
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Principal>()
            .copied()
            .unwrap_or_default())
    }
}

/// Id of a caller that passed `require_authenticated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(principal) = Principal::from_request_parts(parts, state).await;
        require_authenticated(&principal).map(AuthenticatedUser)
    }
}

/// Caller that passed `require_admin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(principal) = Principal::from_request_parts(parts, state).await;
        require_admin(&principal)?;
        Ok(AdminUser(principal))
    }
}
