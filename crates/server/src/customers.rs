//! Customers API endpoints.

use api_types::customer::{CustomerListResponse, CustomerNew, CustomerView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    server::{ServerState, Tenant},
};

fn map_customer(customer: engine::Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        name: customer.name,
        phone: customer.phone,
        email: customer.email,
        created_at: customer.created_at,
    }
}

pub async fn list(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
) -> Result<Json<CustomerListResponse>, ServerError> {
    let customers = state
        .engine
        .list_customers(&user_id)
        .await?
        .into_iter()
        .map(map_customer)
        .collect();

    Ok(Json(CustomerListResponse { customers }))
}

pub async fn customer_new(
    Extension(Tenant(user_id)): Extension<Tenant>,
    State(state): State<ServerState>,
    Json(payload): Json<CustomerNew>,
) -> Result<(StatusCode, Json<CustomerView>), ServerError> {
    let customer = state
        .engine
        .add_customer(
            &user_id,
            &payload.name,
            payload.phone.as_deref(),
            payload.email.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(map_customer(customer))))
}
