//! Monthly allocation grid API endpoints.

use std::collections::BTreeMap;

use api_types::allocation::{AllocationRowView, MonthSave, MonthSaved, MonthView, RowUpsert};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{AllocationRow, DecorQuantities};

use crate::{
    ServerError,
    server::{ServerState, Tenant},
};

fn quantities_from_map(map: BTreeMap<String, i32>) -> Result<DecorQuantities, ServerError> {
    let mut quantities = DecorQuantities::default();
    for (name, quantity) in map {
        quantities.set(&name, quantity)?;
    }
    Ok(quantities)
}

fn engine_row(row: AllocationRowView) -> Result<AllocationRow, ServerError> {
    Ok(AllocationRow {
        row_number: row.row_number,
        customer_name: row.customer_name,
        quantities: quantities_from_map(row.quantities)?,
    })
}

fn map_row(row: AllocationRow) -> AllocationRowView {
    AllocationRowView {
        row_number: row.row_number,
        customer_name: row.customer_name,
        quantities: row
            .quantities
            .entries()
            .into_iter()
            .map(|(name, quantity)| (name.to_string(), quantity))
            .collect(),
    }
}

pub async fn get_month(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Path((year, month)): Path<(i32, i32)>,
) -> Result<Json<MonthView>, ServerError> {
    let rows = state
        .engine
        .list_month(&user_id, month, year)
        .await?
        .into_iter()
        .map(map_row)
        .collect();

    Ok(Json(MonthView { month, year, rows }))
}

/// Replace the month with the submitted rows. Rows without a customer name
/// are dropped.
pub async fn save_month(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Path((year, month)): Path<(i32, i32)>,
    Json(payload): Json<MonthSave>,
) -> Result<Json<MonthSaved>, ServerError> {
    let rows = payload
        .rows
        .into_iter()
        .map(engine_row)
        .collect::<Result<Vec<_>, _>>()?;
    let stored = state.engine.save_month(&user_id, month, year, rows).await?;

    Ok(Json(MonthSaved { stored }))
}

pub async fn upsert_row(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Path((year, month, row_number)): Path<(i32, i32, i32)>,
    Json(payload): Json<RowUpsert>,
) -> Result<Json<AllocationRowView>, ServerError> {
    let row = AllocationRow {
        row_number,
        customer_name: payload.customer_name,
        quantities: quantities_from_map(payload.quantities)?,
    };
    let stored = state
        .engine
        .upsert_allocation_row(&user_id, month, year, row)
        .await?;

    Ok(Json(map_row(stored)))
}
