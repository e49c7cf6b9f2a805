use chrono::Utc;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{AllocationAction, EngineError, InventoryItem, ResultEngine, decor_items};

use super::{Engine, with_tx};

impl Engine {
    /// Move one unit of an item between stock counters.
    ///
    /// The precondition check and the transfer run as a single conditional
    /// `UPDATE ... WHERE <source> > 0`, so concurrent calls can never drive a
    /// counter below zero. When no row is updated the item is re-read to tell
    /// apart a missing item ([`EngineError::KeyNotFound`]), an empty source
    /// counter ([`EngineError::PreconditionFailed`]) and a lost race
    /// ([`EngineError::Conflict`], safe to retry).
    pub async fn apply_action(
        &self,
        user_id: &str,
        item_id: Uuid,
        action: AllocationAction,
    ) -> ResultEngine<InventoryItem> {
        let source = decor_items::Column::from(action.source());
        let target = decor_items::Column::from(action.target());

        with_tx!(self, |db_tx| {
            let updated = decor_items::Entity::update_many()
                .col_expr(source, Expr::col(source).sub(1))
                .col_expr(target, Expr::col(target).add(1))
                .col_expr(decor_items::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(decor_items::Column::Id.eq(item_id))
                .filter(decor_items::Column::UserId.eq(user_id))
                .filter(source.gt(0))
                .exec(&db_tx)
                .await?;

            let model = self.require_item(&db_tx, user_id, item_id).await?;
            if updated.rows_affected == 0 {
                // Replay the transition on what is stored now: an empty source
                // yields the user-facing precondition error.
                model.counts().apply(action)?;
                tracing::warn!(user_id, %item_id, %action, "stock changed concurrently");
                return Err(EngineError::Conflict(format!(
                    "item changed while trying to {action}, retry"
                )));
            }

            tracing::debug!(
                user_id,
                %item_id,
                %action,
                in_store = model.in_store,
                hired = model.hired,
                damaged = model.damaged,
                "stock action applied"
            );
            Ok(InventoryItem::from(model))
        })
    }
}
