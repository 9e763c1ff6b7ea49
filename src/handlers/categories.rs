use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{Category, CategoryUpdate, CategoryWithPath, NewCategory};
use crate::services::categories;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TypeScopeParams {
    #[serde(
        default,
        deserialize_with = "crate::form_utils::deserialize_optional_i64"
    )]
    pub type_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct IconResponse {
    pub icon_file: Option<String>,
}

pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let conn = state.db.get()?;
    Ok(Json(categories::list_all(&conn)?))
}

pub async fn list_by_type(
    State(state): State<AppState>,
    Path(type_id): Path<i64>,
) -> AppResult<Json<Vec<Category>>> {
    let conn = state.db.get()?;
    Ok(Json(categories::list_by_type(&conn, type_id)?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let conn = state.db.get()?;
    Ok(Json(categories::get_category(&conn, id)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewCategory>,
) -> AppResult<Json<Category>> {
    let conn = state.db.get()?;
    Ok(Json(categories::create_category(&conn, &new)?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let conn = state.db.get()?;
    Ok(Json(categories::update_category(&conn, id, &update)?))
}

/// Sorted ids of every category below `id`.
pub async fn descendants(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<i64>>> {
    let conn = state.db.get()?;
    let ids = categories::descendants(&conn, id)?;
    Ok(Json(ids.into_iter().collect()))
}

pub async fn parent_options(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Category>>> {
    let conn = state.db.get()?;
    Ok(Json(categories::parent_options(&conn, id)?))
}

pub async fn selectable(
    State(state): State<AppState>,
    Query(params): Query<TypeScopeParams>,
) -> AppResult<Json<Vec<Category>>> {
    let conn = state.db.get()?;
    Ok(Json(categories::selectable(&conn, params.type_id)?))
}

pub async fn tree(
    State(state): State<AppState>,
    Query(params): Query<TypeScopeParams>,
) -> AppResult<Json<Vec<CategoryWithPath>>> {
    let conn = state.db.get()?;
    Ok(Json(categories::tree(&conn, params.type_id)?))
}

pub async fn icon(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<IconResponse>> {
    let conn = state.db.get()?;
    Ok(Json(IconResponse {
        icon_file: categories::resolve_icon(&conn, id)?,
    }))
}
