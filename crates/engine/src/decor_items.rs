//! The module contains the `InventoryItem` struct and the `decor_items` entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MoneyCents, StockCounts, stock::StockCounter};

/// A decor item owned by a tenant.
///
/// The three counters in [`StockCounts`] partition the item's physical stock.
/// They change either through [`Engine::apply_action`], which conserves the
/// total, or through [`Engine::update_item`], which does not.
///
/// [`Engine::apply_action`]: crate::Engine::apply_action
/// [`Engine::update_item`]: crate::Engine::update_item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub category: String,
    pub item_name: String,
    pub counts: StockCounts,
    pub price: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input of [`Engine::add_item`](crate::Engine::add_item).
#[derive(Clone, Debug, Default)]
pub struct NewItem {
    pub category: String,
    pub item_name: String,
    pub in_store: i32,
    pub price: MoneyCents,
}

/// Direct field edit. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct ItemPatch {
    pub category: Option<String>,
    pub item_name: Option<String>,
    pub in_store: Option<i32>,
    pub hired: Option<i32>,
    pub damaged: Option<i32>,
    pub price: Option<MoneyCents>,
}

impl ItemPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.item_name.is_none()
            && self.in_store.is_none()
            && self.hired.is_none()
            && self.damaged.is_none()
            && self.price.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "decor_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub category: String,
    pub item_name: String,
    pub in_store: i32,
    pub hired: i32,
    pub damaged: i32,
    pub price_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customer_requirements::Entity")]
    Requirements,
}

impl Related<super::customer_requirements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requirements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<StockCounter> for Column {
    fn from(value: StockCounter) -> Self {
        match value {
            StockCounter::InStore => Column::InStore,
            StockCounter::Hired => Column::Hired,
            StockCounter::Damaged => Column::Damaged,
        }
    }
}

impl Model {
    #[must_use]
    pub fn counts(&self) -> StockCounts {
        StockCounts::new(self.in_store, self.hired, self.damaged)
    }
}

impl From<Model> for InventoryItem {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            counts: value.counts(),
            category: value.category,
            item_name: value.item_name,
            price: MoneyCents::new(value.price_minor),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
