//! Monthly allocation grid: per-customer decor quantities for one month.
//!
//! Months are 1-based (`1` = January) in storage, queries and the API.

use chrono::Utc;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, util::ensure_non_negative};

/// Declares [`DecorQuantities`] and its mapping onto the entity columns.
macro_rules! decor_quantities {
    ($($field:ident),+ $(,)?) => {
        /// Quantity per decor sub-category, in grid order.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct DecorQuantities {
            $(pub $field: i32,)+
        }

        impl DecorQuantities {
            /// Column names, in grid order.
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            /// `(column, quantity)` pairs, in grid order.
            #[must_use]
            pub fn entries(&self) -> Vec<(&'static str, i32)> {
                vec![$((stringify!($field), self.$field)),+]
            }

            /// Set one quantity by its column name.
            pub fn set(&mut self, name: &str, quantity: i32) -> ResultEngine<()> {
                $(
                    if name == stringify!($field) {
                        self.$field = quantity;
                        return Ok(());
                    }
                )+
                Err(EngineError::InvalidInput(format!(
                    "unknown decor column: {name}"
                )))
            }

            fn from_model(model: &Model) -> Self {
                Self {
                    $($field: model.$field,)+
                }
            }

            fn write_into(&self, active: &mut ActiveModel) {
                $(active.$field = ActiveValue::Set(self.$field);)+
            }
        }
    };
}

decor_quantities!(
    walkway_stands,
    arc,
    centerpieces,
    fairy_lights,
    chandeliers,
    uplighters,
    lanterns,
    candle_holders,
    backdrop,
    stage_decor,
    chair_covers,
    chair_sashes,
    table_runners,
    table_cloths,
    charger_plates,
    flower_stands,
    artificial_flowers,
    pillars,
    drapes,
    carpet,
    welcome_board,
    easels,
    cake_stands,
    mirror_plates,
    hanging_decor,
    neon_signs,
);

impl DecorQuantities {
    pub fn validate(&self) -> ResultEngine<()> {
        for (name, value) in self.entries() {
            ensure_non_negative(value, name)?;
        }
        Ok(())
    }
}

/// One row of the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRow {
    /// Caller-assigned position; part of the row's identity.
    pub row_number: i32,
    pub customer_name: String,
    pub quantities: DecorQuantities,
}

impl AllocationRow {
    /// Rows without a customer name are dropped on save.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.customer_name.trim().is_empty()
    }
}

/// Calendar month with the 1-12 convention enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonthKey {
    month: i32,
    year: i32,
}

impl MonthKey {
    pub fn new(month: i32, year: i32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidInput(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(1..=9999).contains(&year) {
            return Err(EngineError::InvalidInput(format!(
                "year must be between 1 and 9999, got {year}"
            )));
        }
        Ok(Self { month, year })
    }

    #[must_use]
    pub const fn month(self) -> i32 {
        self.month
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "monthly_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub row_number: i32,
    pub customer_name: String,
    pub walkway_stands: i32,
    pub arc: i32,
    pub centerpieces: i32,
    pub fairy_lights: i32,
    pub chandeliers: i32,
    pub uplighters: i32,
    pub lanterns: i32,
    pub candle_holders: i32,
    pub backdrop: i32,
    pub stage_decor: i32,
    pub chair_covers: i32,
    pub chair_sashes: i32,
    pub table_runners: i32,
    pub table_cloths: i32,
    pub charger_plates: i32,
    pub flower_stands: i32,
    pub artificial_flowers: i32,
    pub pillars: i32,
    pub drapes: i32,
    pub carpet: i32,
    pub welcome_board: i32,
    pub easels: i32,
    pub cake_stands: i32,
    pub mirror_plates: i32,
    pub hanging_decor: i32,
    pub neon_signs: i32,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Column {
    /// Columns identifying a row; everything else is overwritten on upsert.
    #[must_use]
    pub fn is_key(self) -> bool {
        matches!(
            self,
            Column::UserId | Column::Month | Column::Year | Column::RowNumber
        )
    }
}

impl From<Model> for AllocationRow {
    fn from(value: Model) -> Self {
        Self {
            row_number: value.row_number,
            quantities: DecorQuantities::from_model(&value),
            customer_name: value.customer_name,
        }
    }
}

/// Builds the row to persist, stamped with the tenant and month.
pub(crate) fn active_model(user_id: &str, key: MonthKey, row: &AllocationRow) -> ActiveModel {
    let mut active = ActiveModel {
        user_id: ActiveValue::Set(user_id.to_string()),
        month: ActiveValue::Set(key.month()),
        year: ActiveValue::Set(key.year()),
        row_number: ActiveValue::Set(row.row_number),
        customer_name: ActiveValue::Set(row.customer_name.trim().to_string()),
        updated_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    };
    row.quantities.write_into(&mut active);
    active
}
