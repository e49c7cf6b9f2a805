use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Customer, EngineError, ResultEngine, customers,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    pub(super) async fn require_customer(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        customer_id: Uuid,
    ) -> ResultEngine<customers::Model> {
        customers::Entity::find_by_id(customer_id)
            .filter(customers::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))
    }

    /// Register a customer that requirements can point at.
    pub async fn add_customer(
        &self,
        user_id: &str,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> ResultEngine<Customer> {
        let name = normalize_required_text(name, "customer name")?;
        let phone = normalize_optional_text(phone);
        let email = normalize_optional_text(email);
        with_tx!(self, |db_tx| {
            let active = customers::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name),
                phone: ActiveValue::Set(phone),
                email: ActiveValue::Set(email),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;
            Ok(Customer::from(model))
        })
    }

    /// Customers of a tenant ordered by name.
    pub async fn list_customers(&self, user_id: &str) -> ResultEngine<Vec<Customer>> {
        with_tx!(self, |db_tx| {
            let customers = customers::Entity::find()
                .filter(customers::Column::UserId.eq(user_id))
                .order_by_asc(customers::Column::Name)
                .order_by_asc(customers::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Customer::from)
                .collect();
            Ok(customers)
        })
    }
}
