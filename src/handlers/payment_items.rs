use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::categories::IconResponse;
use crate::models::{NewPaymentItem, PaymentItemUpdate, PaymentItemWithRelations};
use crate::services::payment_items::{self, PaymentItemQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PaymentItemParams {
    #[serde(default)]
    pub expense_only: bool,
    #[serde(default)]
    pub income_only: bool,
    /// Comma-separated; descendants of each id are included.
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_id_list")]
    pub category_ids: Vec<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaymentItemParams>,
) -> AppResult<Json<Vec<PaymentItemWithRelations>>> {
    let conn = state.db.get()?;

    let query = PaymentItemQuery {
        expense_only: params.expense_only,
        income_only: params.income_only,
        category_ids: params.category_ids,
    };

    Ok(Json(payment_items::list(&conn, &query)?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PaymentItemWithRelations>> {
    let conn = state.db.get()?;
    Ok(Json(payment_items::get(&conn, id)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewPaymentItem>,
) -> AppResult<Json<PaymentItemWithRelations>> {
    let conn = state.db.get()?;
    Ok(Json(payment_items::create(&conn, &new)?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<PaymentItemUpdate>,
) -> AppResult<Json<PaymentItemWithRelations>> {
    let conn = state.db.get()?;
    Ok(Json(payment_items::update(&conn, id, &update)?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let conn = state.db.get()?;
    payment_items::delete(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn icon(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<IconResponse>> {
    let conn = state.db.get()?;
    Ok(Json(IconResponse {
        icon_file: payment_items::resolve_icon(&conn, id)?,
    }))
}
