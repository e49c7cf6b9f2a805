use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
    typed_header::TypedHeaderRejection,
};

use std::sync::Arc;

use crate::{allocations, categories, customers, inventory, requirements};
use engine::Engine;

static TENANT_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-tenant-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Tenant resolved by the upstream authorization layer.
///
/// Inserted as a request extension by the `tenant` middleware.
#[derive(Clone, Debug)]
pub struct Tenant(pub String);

/// `TypedHeader` for the tenant header
///
/// Every request must carry a non-empty "x-tenant-id" entry.
#[derive(Debug)]
struct TenantHeader(String);

impl Header for TenantHeader {
    fn name() -> &'static axum::http::HeaderName {
        &TENANT_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(TenantHeader(value.trim().to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-tenant-id header"),
        }
    }
}

async fn tenant(
    tenant_header: Result<TypedHeader<TenantHeader>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Ok(TypedHeader(TenantHeader(user_id))) = tenant_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if user_id.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    request.extensions_mut().insert(Tenant(user_id));
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/inventory", get(inventory::list).post(inventory::item_new))
        .route(
            "/inventory/{id}",
            get(inventory::get).patch(inventory::update),
        )
        .route(
            "/inventory/{id}/actions",
            axum::routing::post(inventory::apply_action),
        )
        .route("/categories", get(categories::list))
        .route(
            "/customers",
            get(customers::list).post(customers::customer_new),
        )
        .route(
            "/requirements",
            get(requirements::list).post(requirements::requirement_new),
        )
        .route(
            "/requirements/{id}",
            axum::routing::patch(requirements::update).delete(requirements::remove),
        )
        .route(
            "/allocations/{year}/{month}",
            get(allocations::get_month).put(allocations::save_month),
        )
        .route(
            "/allocations/{year}/{month}/rows/{row_number}",
            put(allocations::upsert_row),
        )
        .route_layer(middleware::from_fn(tenant))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
