//! Recipe-detail route handler.

use axum::{
    Json,
    extract::{Path, State},
};
use mes_core::RecipeDetailsId;
use serde::Serialize;

use crate::db::recipes;
use crate::error::AppError;
use crate::models::recipe::RecipeDetail;
use crate::state::AppState;

/// The detail payload spreads its collections at the top level next to
/// the success flag rather than under `data`.
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub success: bool,
    #[serde(flatten)]
    pub detail: RecipeDetail,
}

/// `GET /api/production-recipe-detail/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>, AppError> {
    let id: i32 = id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid recipe id".to_string()))?;

    let detail = recipes::detail(state.pool(), RecipeDetailsId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(DetailResponse {
        success: true,
        detail,
    }))
}
