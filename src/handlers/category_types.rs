use axum::extract::State;
use axum::response::Json;

use crate::error::AppResult;
use crate::models::{CategoryType, NewCategoryType};
use crate::services::categories;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryType>>> {
    let conn = state.db.get()?;
    Ok(Json(categories::list_types(&conn)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewCategoryType>,
) -> AppResult<Json<CategoryType>> {
    let conn = state.db.get()?;
    Ok(Json(categories::create_type(&conn, &new)?))
}
