use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod inventory {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InventoryList {
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub category: String,
        pub item_name: String,
        #[serde(default)]
        pub in_store: i32,
        /// Unit price in minor units (cents).
        pub price_minor: i64,
    }

    /// Direct field edit. Absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ItemUpdate {
        pub category: Option<String>,
        pub item_name: Option<String>,
        pub in_store: Option<i32>,
        pub hired: Option<i32>,
        pub damaged: Option<i32>,
        pub price_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: Uuid,
        pub category: String,
        pub item_name: String,
        pub in_store: i32,
        pub hired: i32,
        pub damaged: i32,
        pub price_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemListResponse {
        pub items: Vec<ItemView>,
    }

    /// Body of `POST /inventory/{id}/actions`.
    ///
    /// `action` is one of `hire`, `return`, `damage`, `repair`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemAction {
        pub action: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<String>,
        /// Predefined categories with no item yet.
        pub missing: Vec<String>,
        /// Categories in use that are not in the predefined list.
        pub unexpected: Vec<String>,
    }
}

pub mod customer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        pub phone: Option<String>,
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: Uuid,
        pub name: String,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerListResponse {
        pub customers: Vec<CustomerView>,
    }
}

pub mod requirement {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RequirementStatus {
        Pending,
        Confirmed,
        Delivered,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequirementList {
        pub customer_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequirementNew {
        pub customer_id: Uuid,
        pub decor_item_id: Uuid,
        /// Defaults to 1. Adding an existing (customer, item) pair accumulates.
        pub quantity: Option<i32>,
    }

    /// Explicit edit. `notes: null` clears the notes; an absent key keeps them.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RequirementUpdate {
        pub status: Option<RequirementStatus>,
        pub quantity_required: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
        pub notes: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequirementView {
        pub id: Uuid,
        pub customer_id: Uuid,
        pub customer_name: String,
        pub decor_item_id: Uuid,
        pub item_name: String,
        pub category: String,
        pub price_minor: i64,
        pub quantity_required: i32,
        pub status: RequirementStatus,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequirementListResponse {
        pub requirements: Vec<RequirementView>,
        /// Σ price × quantity over the listed rows, in minor units.
        pub total_value_minor: i64,
    }

    mod double_option {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(inner) => inner.serialize(serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer).map(Some)
        }
    }

}

pub mod allocation {
    use std::collections::BTreeMap;

    use super::*;

    /// One grid row. `quantities` maps decor column names to counts;
    /// columns left out are zero.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AllocationRowView {
        pub row_number: i32,
        pub customer_name: String,
        #[serde(default)]
        pub quantities: BTreeMap<String, i32>,
    }

    /// Body of `PUT /allocations/{year}/{month}`. Replaces the whole month.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthSave {
        pub rows: Vec<AllocationRowView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthSaved {
        pub stored: usize,
    }

    /// Body of `PUT /allocations/{year}/{month}/rows/{row_number}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RowUpsert {
        pub customer_name: String,
        #[serde(default)]
        pub quantities: BTreeMap<String, i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthView {
        pub month: i32,
        pub year: i32,
        pub rows: Vec<AllocationRowView>,
    }
}
