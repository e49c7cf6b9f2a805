//! Inventory API endpoints.

use api_types::inventory::{
    InventoryList, ItemAction, ItemListResponse, ItemNew, ItemUpdate, ItemView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{AllocationAction, EngineError, InventoryItem, ItemPatch, MoneyCents, NewItem};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{ServerState, Tenant},
};

fn map_item(item: InventoryItem) -> ItemView {
    ItemView {
        id: item.id,
        category: item.category,
        item_name: item.item_name,
        in_store: item.counts.in_store,
        hired: item.counts.hired,
        damaged: item.counts.damaged,
        price_minor: item.price.cents(),
        created_at: item.created_at,
        updated_at: item.updated_at,
    }
}

pub async fn list(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<InventoryList>,
) -> Result<Json<ItemListResponse>, ServerError> {
    let items = state
        .engine
        .list_items(&user_id, query.category.as_deref())
        .await?
        .into_iter()
        .map(map_item)
        .collect();

    Ok(Json(ItemListResponse { items }))
}

pub async fn get(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemView>, ServerError> {
    let item = state.engine.item(&user_id, item_id).await?;
    Ok(Json(map_item(item)))
}

pub async fn item_new(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Json(payload): Json<ItemNew>,
) -> Result<(StatusCode, Json<ItemView>), ServerError> {
    let item = state
        .engine
        .add_item(
            &user_id,
            NewItem {
                category: payload.category,
                item_name: payload.item_name,
                in_store: payload.in_store,
                price: MoneyCents::new(payload.price_minor),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(map_item(item))))
}

pub async fn update(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ItemUpdate>,
) -> Result<Json<ItemView>, ServerError> {
    let patch = ItemPatch {
        category: payload.category,
        item_name: payload.item_name,
        in_store: payload.in_store,
        hired: payload.hired,
        damaged: payload.damaged,
        price: payload.price_minor.map(MoneyCents::new),
    };
    let item = state.engine.update_item(&user_id, item_id, patch).await?;
    Ok(Json(map_item(item)))
}

/// Run one state-machine action.
///
/// A `Conflict` means another request changed the item between the
/// conditional update and the re-read; the action is retried once.
pub async fn apply_action(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ItemAction>,
) -> Result<Json<ItemView>, ServerError> {
    let action: AllocationAction = payload.action.parse()?;

    let item = match state.engine.apply_action(&user_id, item_id, action).await {
        Err(EngineError::Conflict(detail)) => {
            tracing::debug!(item_id = %item_id, %action, "retrying after conflict: {detail}");
            state.engine.apply_action(&user_id, item_id, action).await?
        }
        other => other?,
    };

    Ok(Json(map_item(item)))
}
