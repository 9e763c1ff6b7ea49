use axum::extract::{Path, State};
use axum::response::Json;

use crate::db::queries::recipients;
use crate::error::{AppError, AppResult};
use crate::models::{NewRecipient, Recipient};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Recipient>>> {
    let conn = state.db.get()?;
    Ok(Json(recipients::list_recipients(&conn)?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Recipient>> {
    let conn = state.db.get()?;
    let recipient = recipients::get_recipient(&conn, id)?
        .ok_or_else(|| AppError::NotFound("Recipient not found".into()))?;
    Ok(Json(recipient))
}

pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<NewRecipient>,
) -> AppResult<Json<Recipient>> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "Recipient name must not be empty".into(),
        ));
    }

    let conn = state.db.get()?;
    let id = recipients::create_recipient(
        &conn,
        &NewRecipient {
            name: name.to_string(),
            address: form.address,
        },
    )?;

    let recipient = recipients::get_recipient(&conn, id)?
        .ok_or_else(|| AppError::Internal("Failed to retrieve created recipient".into()))?;
    Ok(Json(recipient))
}
