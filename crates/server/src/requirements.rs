//! Customer requirements API endpoints.

use api_types::requirement::{
    RequirementList, RequirementListResponse, RequirementNew, RequirementStatus as ApiStatus,
    RequirementUpdate, RequirementView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{EngineError, Requirement, RequirementPatch, RequirementStatus, requirements_total};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, Tenant},
};

fn map_status(status: RequirementStatus) -> ApiStatus {
    match status {
        RequirementStatus::Pending => ApiStatus::Pending,
        RequirementStatus::Confirmed => ApiStatus::Confirmed,
        RequirementStatus::Delivered => ApiStatus::Delivered,
    }
}

fn engine_status(status: ApiStatus) -> RequirementStatus {
    match status {
        ApiStatus::Pending => RequirementStatus::Pending,
        ApiStatus::Confirmed => RequirementStatus::Confirmed,
        ApiStatus::Delivered => RequirementStatus::Delivered,
    }
}

fn map_view(view: engine::RequirementView) -> RequirementView {
    let requirement = view.requirement;
    RequirementView {
        id: requirement.id,
        customer_id: requirement.customer_id,
        customer_name: view.customer_name,
        decor_item_id: requirement.decor_item_id,
        item_name: view.item_name,
        category: view.category,
        price_minor: view.price.cents(),
        quantity_required: requirement.quantity_required,
        status: map_status(requirement.status),
        notes: requirement.notes,
        created_at: requirement.created_at,
        updated_at: requirement.updated_at,
    }
}

/// Re-read `requirement` in its denormalized form.
async fn view_of(
    state: &ServerState,
    user_id: &str,
    requirement: Requirement,
) -> Result<RequirementView, ServerError> {
    let view = state
        .engine
        .list_requirements(user_id, Some(requirement.customer_id))
        .await?
        .into_iter()
        .find(|view| view.requirement.id == requirement.id)
        .ok_or_else(|| EngineError::KeyNotFound("requirement not exists".to_string()))?;
    Ok(map_view(view))
}

pub async fn list(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<RequirementList>,
) -> Result<Json<RequirementListResponse>, ServerError> {
    let views = state
        .engine
        .list_requirements(&user_id, query.customer_id)
        .await?;
    let total = requirements_total(&views)?;

    Ok(Json(RequirementListResponse {
        requirements: views.into_iter().map(map_view).collect(),
        total_value_minor: total.cents(),
    }))
}

pub async fn requirement_new(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Json(payload): Json<RequirementNew>,
) -> Result<(StatusCode, Json<RequirementView>), ServerError> {
    let requirement = state
        .engine
        .add_requirement(
            &user_id,
            payload.customer_id,
            payload.decor_item_id,
            payload.quantity.unwrap_or(1),
        )
        .await?;
    let view = view_of(&state, &user_id, requirement).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Path(requirement_id): Path<Uuid>,
    Json(payload): Json<RequirementUpdate>,
) -> Result<Json<RequirementView>, ServerError> {
    let patch = RequirementPatch {
        status: payload.status.map(engine_status),
        quantity_required: payload.quantity_required,
        notes: payload.notes,
    };
    let requirement = state
        .engine
        .update_requirement(&user_id, requirement_id, patch)
        .await?;

    Ok(Json(view_of(&state, &user_id, requirement).await?))
}

pub async fn remove(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Path(requirement_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_requirement(&user_id, requirement_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
