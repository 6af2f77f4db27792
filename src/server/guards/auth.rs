use crate::auth::{ADMIN_USER_ID, Identity};
use crate::error::AppError;
use crate::server::router::AppState;
use crate::server::session;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};

fn jar_from_parts(parts: &Parts, state: &AppState) -> PrivateCookieJar {
    PrivateCookieJar::from_headers(&parts.headers, Key::from_ref(state))
}

/// The identity resolved from the request's session cookie, or `None` for
/// anonymous or stale sessions.
pub struct CurrentUser(pub Option<Identity>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = jar_from_parts(parts, state);
        let Some(id) = session::user_id(&jar) else {
            return Ok(Self(None));
        };
        let user = state.db.get_user_by_id(id).await?;
        Ok(Self(user.map(Identity::from)))
    }
}

/// Guard for admin-only routes: allowed iff the session user id equals the
/// distinguished first-registrant id. Everyone else, anonymous included, is
/// rejected with a bare 403; no redirect, no message.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = jar_from_parts(parts, state);
        match session::user_id(&jar) {
            Some(id) if id == ADMIN_USER_ID => Ok(RequireAdmin),
            _ => Err(StatusCode::FORBIDDEN),
        }
    }
}
