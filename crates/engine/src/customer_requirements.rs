//! Customer requirements: how many units of a decor item a customer wants.
//!
//! A requirement is a demand record, not a reservation. It never touches the
//! item's stock counters.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    #[default]
    Pending,
    Confirmed,
    Delivered,
}

impl RequirementStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequirementStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "delivered" => Ok(Self::Delivered),
            other => Err(EngineError::InvalidInput(format!(
                "unknown requirement status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub decor_item_id: Uuid,
    pub quantity_required: i32,
    pub status: RequirementStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A requirement denormalized with the customer and item it references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementView {
    pub requirement: Requirement,
    pub customer_name: String,
    pub item_name: String,
    pub category: String,
    pub price: MoneyCents,
}

impl RequirementView {
    /// `price × quantity_required`.
    pub fn line_total(&self) -> ResultEngine<MoneyCents> {
        self.price
            .checked_times(self.requirement.quantity_required)
            .ok_or_else(|| EngineError::InvalidInput("requirement value overflow".to_string()))
    }
}

/// Sum of `price × quantity_required` over `views`.
///
/// This is a reporting value computed on demand; it is never stored.
pub fn requirements_total(views: &[RequirementView]) -> ResultEngine<MoneyCents> {
    views.iter().try_fold(MoneyCents::ZERO, |acc, view| {
        acc.checked_add(view.line_total()?)
            .ok_or_else(|| EngineError::InvalidInput("requirement value overflow".to_string()))
    })
}

/// Explicit edit of a requirement. `None` leaves the field untouched.
///
/// `notes: Some(None)` clears the notes.
#[derive(Clone, Debug, Default)]
pub struct RequirementPatch {
    pub status: Option<RequirementStatus>,
    pub quantity_required: Option<i32>,
    pub notes: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customer_requirements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub customer_id: Uuid,
    pub decor_item_id: Uuid,
    pub quantity_required: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::decor_items::Entity",
        from = "Column::DecorItemId",
        to = "super::decor_items::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DecorItem,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::decor_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DecorItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Requirement {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            customer_id: value.customer_id,
            decor_item_id: value.decor_item_id,
            quantity_required: value.quantity_required,
            status: value.status.parse()?,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}
