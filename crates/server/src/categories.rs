//! Categories API endpoints.

use api_types::category::CategoryListResponse;
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError,
    server::{ServerState, Tenant},
};

/// Categories in use, with the drift against the predefined list.
pub async fn list(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let overview = state.engine.category_overview(&user_id).await?;

    Ok(Json(CategoryListResponse {
        categories: overview.present,
        missing: overview.missing,
        unexpected: overview.unexpected,
    }))
}
