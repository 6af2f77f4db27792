use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde_json::json;

use crate::db::DbCafe;
use crate::error::AppError;
use crate::server::flash;
use crate::server::guards::auth::CurrentUser;
use crate::server::router::AppState;

/// GET /
///
/// Landing page payload: pending flash notice plus the current login state.
/// Markup is the rendering layer's concern.
pub async fn home(CurrentUser(user): CurrentUser, jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, notice) = flash::take(jar);
    (
        jar,
        Json(json!({
            "page": "home",
            "flash": notice,
            "logged_in_as": user.map(|u| u.name),
        })),
    )
}

/// GET /all
///
/// Every cafe on record, in insertion (id) order. No pagination, no
/// filtering.
pub async fn all_cafes(State(state): State<AppState>) -> Result<Json<Vec<DbCafe>>, AppError> {
    Ok(Json(state.db.list_cafes().await?))
}
