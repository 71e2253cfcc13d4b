use crate::dtos::{RecipeRequest, RecipeResponse};
use crate::startup::AppState;
use axum::{extract::State, Json};
use recipe_core::error::AppError;
use validator::Validate;

/// `POST /recipe` — validate the prompt, relay it upstream, map the result.
///
/// Validation failures return 400 before any outbound call is made.
pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(payload): Json<RecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    payload.validate()?;

    tracing::info!(prompt_len = payload.prompt.len(), "Generating recipe");

    let recipe = state.chef.generate_recipe(&payload.prompt).await?;

    tracing::info!("Recipe generated successfully");

    Ok(Json(RecipeResponse { recipe }))
}
