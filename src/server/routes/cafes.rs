//! Admin-only cafe CRUD handlers. The admin gate is layered over this whole
//! route group in the router; by the time these run, the caller is the admin.

use axum::{
    Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};
use tracing::info;

use crate::db::DbCafe;
use crate::error::AppError;
use crate::forms::{AMENITY_CHOICES, CafeForm, SEAT_BUCKETS};
use crate::server::router::AppState;

fn form_descriptor(values: Option<&DbCafe>) -> Value {
    json!({
        "form": "cafe",
        "choices": {
            "seats": SEAT_BUCKETS,
            "has_sockets": AMENITY_CHOICES,
            "has_toilet": AMENITY_CHOICES,
            "has_wifi": AMENITY_CHOICES,
            "can_take_calls": AMENITY_CHOICES,
        },
        "values": values.map(|cafe| json!({
            "cafe_name": cafe.name,
            "map_url": cafe.map_url,
            "image_url": cafe.img_url,
            "location": cafe.location,
            "seats": cafe.seats,
            "has_sockets": cafe.has_sockets,
            "has_toilet": cafe.has_toilet,
            "has_wifi": cafe.has_wifi,
            "can_take_calls": cafe.can_take_calls,
            "coffee_price": cafe.coffee_price,
        })),
    })
}

/// GET /add
pub async fn add_cafe_form() -> Json<Value> {
    Json(form_descriptor(None))
}

/// POST /add
pub async fn add_cafe(
    State(state): State<AppState>,
    Form(form): Form<CafeForm>,
) -> Result<Response, AppError> {
    let fields = form.validate().map_err(AppError::Validation)?;
    let id = state.db.create_cafe(fields).await?;
    info!(cafe_id = id, "cafe created");
    Ok(Redirect::to("/all").into_response())
}

/// GET /edit-cafe/{id}
///
/// Pre-populates the edit form from the stored record; a missing id is an
/// explicit 404, never a blank form.
pub async fn edit_cafe_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let cafe = state.db.get_cafe(id).await?;
    Ok(Json(form_descriptor(Some(&cafe))))
}

/// POST,PATCH /edit-cafe/{id}
///
/// Full-record replace of all mutable fields.
pub async fn edit_cafe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<CafeForm>,
) -> Result<Response, AppError> {
    let fields = form.validate().map_err(AppError::Validation)?;
    state.db.update_cafe(id, fields).await?;
    info!(cafe_id = id, "cafe updated");
    Ok(Redirect::to("/all").into_response())
}

/// GET,DELETE /delete-cafe/{id}
pub async fn delete_cafe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.db.delete_cafe(id).await?;
    info!(cafe_id = id, "cafe deleted");
    Ok(Redirect::to("/all").into_response())
}
