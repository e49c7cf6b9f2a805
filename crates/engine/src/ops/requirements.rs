use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, Requirement, RequirementPatch, RequirementStatus, RequirementView,
    ResultEngine, customer_requirements, customers, decor_items,
    util::{ensure_positive_quantity, normalize_optional_text},
};

use super::{Engine, with_tx};

impl Engine {
    async fn require_requirement(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        requirement_id: Uuid,
    ) -> ResultEngine<customer_requirements::Model> {
        customer_requirements::Entity::find_by_id(requirement_id)
            .filter(customer_requirements::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("requirement not exists".to_string()))
    }

    /// Record that a customer needs `quantity` more units of an item.
    ///
    /// The first call for a (customer, item) pair creates a `pending`
    /// requirement; later calls add to `quantity_required` and keep the
    /// existing status and notes. Both paths are one
    /// `INSERT ... ON CONFLICT DO UPDATE` on the business key, so concurrent
    /// callers accumulate into a single row. The update only applies while the
    /// sum still fits in an `i32`.
    pub async fn add_requirement(
        &self,
        user_id: &str,
        customer_id: Uuid,
        decor_item_id: Uuid,
        quantity: i32,
    ) -> ResultEngine<Requirement> {
        ensure_positive_quantity(quantity)?;

        let referenced: ResultEngine<()> = with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, user_id, customer_id).await?;
            self.require_item(&db_tx, user_id, decor_item_id).await?;
            Ok(())
        });
        referenced?;

        // The upsert is the first statement so the write lock is taken before
        // anything is read.
        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let active = customer_requirements::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id.to_string()),
                customer_id: ActiveValue::Set(customer_id),
                decor_item_id: ActiveValue::Set(decor_item_id),
                quantity_required: ActiveValue::Set(quantity),
                status: ActiveValue::Set(RequirementStatus::Pending.as_str().to_string()),
                notes: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };

            let stored_quantity = Expr::col((
                customer_requirements::Entity,
                customer_requirements::Column::QuantityRequired,
            ));
            let written = customer_requirements::Entity::insert(active)
                .on_conflict(
                    OnConflict::columns([
                        customer_requirements::Column::UserId,
                        customer_requirements::Column::CustomerId,
                        customer_requirements::Column::DecorItemId,
                    ])
                    .value(
                        customer_requirements::Column::QuantityRequired,
                        stored_quantity.clone().add(quantity),
                    )
                    .value(customer_requirements::Column::UpdatedAt, Expr::value(now))
                    .action_and_where(stored_quantity.lte(i32::MAX - quantity))
                    .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;
            if written == 0 {
                return Err(EngineError::InvalidInput("quantity too large".to_string()));
            }

            let model = customer_requirements::Entity::find()
                .filter(customer_requirements::Column::UserId.eq(user_id))
                .filter(customer_requirements::Column::CustomerId.eq(customer_id))
                .filter(customer_requirements::Column::DecorItemId.eq(decor_item_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::Conflict("requirement vanished after upsert".to_string())
                })?;

            tracing::debug!(
                user_id,
                %customer_id,
                %decor_item_id,
                added = quantity,
                quantity_required = model.quantity_required,
                "requirement recorded"
            );
            Requirement::try_from(model)
        })
    }

    /// Overwrite status, quantity and/or notes of a requirement.
    pub async fn update_requirement(
        &self,
        user_id: &str,
        requirement_id: Uuid,
        patch: RequirementPatch,
    ) -> ResultEngine<Requirement> {
        if patch.status.is_none() && patch.quantity_required.is_none() && patch.notes.is_none() {
            return Err(EngineError::InvalidInput(
                "provide at least one of status, quantity or notes".to_string(),
            ));
        }
        if let Some(quantity) = patch.quantity_required {
            ensure_positive_quantity(quantity)?;
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_requirement(&db_tx, user_id, requirement_id)
                .await?;

            let mut active: customer_requirements::ActiveModel = model.into();
            if let Some(status) = patch.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(quantity) = patch.quantity_required {
                active.quantity_required = ActiveValue::Set(quantity);
            }
            if let Some(notes) = patch.notes {
                active.notes = ActiveValue::Set(normalize_optional_text(notes.as_deref()));
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let updated = active.update(&db_tx).await?;
            Requirement::try_from(updated)
        })
    }

    /// Hard-delete a requirement.
    pub async fn remove_requirement(&self, user_id: &str, requirement_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let res = customer_requirements::Entity::delete_many()
                .filter(customer_requirements::Column::Id.eq(requirement_id))
                .filter(customer_requirements::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(
                    "requirement not exists".to_string(),
                ));
            }
            Ok(())
        })
    }

    /// Requirements of a tenant, optionally for one customer, with customer
    /// and item details attached. Ordered by customer name, then item name.
    ///
    /// See [`requirements_total`](crate::requirements_total) for the value of
    /// the returned set.
    pub async fn list_requirements(
        &self,
        user_id: &str,
        customer_id: Option<Uuid>,
    ) -> ResultEngine<Vec<RequirementView>> {
        with_tx!(self, |db_tx| {
            let mut query = customer_requirements::Entity::find()
                .filter(customer_requirements::Column::UserId.eq(user_id));
            if let Some(customer_id) = customer_id {
                query = query.filter(customer_requirements::Column::CustomerId.eq(customer_id));
            }
            let models = query.all(&db_tx).await?;
            if models.is_empty() {
                return Ok(Vec::new());
            }

            let customer_ids: Vec<Uuid> = models.iter().map(|m| m.customer_id).collect();
            let item_ids: Vec<Uuid> = models.iter().map(|m| m.decor_item_id).collect();

            let customer_names: HashMap<Uuid, String> = customers::Entity::find()
                .filter(customers::Column::UserId.eq(user_id))
                .filter(customers::Column::Id.is_in(customer_ids))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            let items: HashMap<Uuid, decor_items::Model> = decor_items::Entity::find()
                .filter(decor_items::Column::UserId.eq(user_id))
                .filter(decor_items::Column::Id.is_in(item_ids))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|item| (item.id, item))
                .collect();

            let mut views = Vec::with_capacity(models.len());
            for model in models {
                let customer_name = customer_names
                    .get(&model.customer_id)
                    .cloned()
                    .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;
                let item = items
                    .get(&model.decor_item_id)
                    .ok_or_else(|| EngineError::KeyNotFound("decor item not exists".to_string()))?;
                views.push(RequirementView {
                    customer_name,
                    item_name: item.item_name.clone(),
                    category: item.category.clone(),
                    price: MoneyCents::new(item.price_minor),
                    requirement: Requirement::try_from(model)?,
                });
            }

            views.sort_by(|a, b| {
                a.customer_name
                    .cmp(&b.customer_name)
                    .then_with(|| a.item_name.cmp(&b.item_name))
                    .then_with(|| a.requirement.created_at.cmp(&b.requirement.created_at))
            });
            Ok(views)
        })
    }
}
