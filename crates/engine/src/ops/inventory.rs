use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, InventoryItem, ItemPatch, MoneyCents, NewItem, ResultEngine, decor_items,
    util::{ensure_non_negative, normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

/// Categories the dashboard offers out of the box.
///
/// Items may use any category; this list only feeds [`CategoryOverview`].
pub const PREDEFINED_CATEGORIES: [&str; 8] = [
    "Arches",
    "Backdrops",
    "Centerpieces",
    "Furniture",
    "Lighting",
    "Linen",
    "Stage",
    "Walkway",
];

/// Present categories compared with [`PREDEFINED_CATEGORIES`].
///
/// Purely informational: nothing is enforced from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryOverview {
    pub present: Vec<String>,
    /// Predefined categories with no item yet.
    pub missing: Vec<String>,
    /// Categories in use that are not predefined.
    pub unexpected: Vec<String>,
}

impl CategoryOverview {
    fn from_present(present: Vec<String>) -> Self {
        let missing = PREDEFINED_CATEGORIES
            .iter()
            .filter(|name| !present.iter().any(|p| p.eq_ignore_ascii_case(name)))
            .map(ToString::to_string)
            .collect();
        let unexpected = present
            .iter()
            .filter(|p| !PREDEFINED_CATEGORIES.iter().any(|n| p.eq_ignore_ascii_case(n)))
            .cloned()
            .collect();
        Self {
            present,
            missing,
            unexpected,
        }
    }

    #[must_use]
    pub fn matches_predefined(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

fn ensure_price(price: MoneyCents) -> ResultEngine<()> {
    if price.cents() < 0 {
        return Err(EngineError::InvalidInput(
            "price must not be negative".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    pub(super) async fn require_item(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        item_id: Uuid,
    ) -> ResultEngine<decor_items::Model> {
        decor_items::Entity::find_by_id(item_id)
            .filter(decor_items::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("decor item not exists".to_string()))
    }

    /// Items of a tenant ordered by `(category, item_name)`, optionally
    /// restricted to one category.
    pub async fn list_items(
        &self,
        user_id: &str,
        category: Option<&str>,
    ) -> ResultEngine<Vec<InventoryItem>> {
        let category = normalize_optional_text(category);
        with_tx!(self, |db_tx| {
            let mut query =
                decor_items::Entity::find().filter(decor_items::Column::UserId.eq(user_id));
            if let Some(category) = category {
                query = query.filter(decor_items::Column::Category.eq(category));
            }
            let items = query
                .order_by_asc(decor_items::Column::Category)
                .order_by_asc(decor_items::Column::ItemName)
                .order_by_asc(decor_items::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(InventoryItem::from)
                .collect();
            Ok(items)
        })
    }

    /// Return a single item.
    pub async fn item(&self, user_id: &str, item_id: Uuid) -> ResultEngine<InventoryItem> {
        with_tx!(self, |db_tx| {
            let model = self.require_item(&db_tx, user_id, item_id).await?;
            Ok(InventoryItem::from(model))
        })
    }

    /// Distinct categories currently in use, sorted.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<String>> {
        with_tx!(self, |db_tx| {
            let categories: Vec<String> = decor_items::Entity::find()
                .select_only()
                .column(decor_items::Column::Category)
                .distinct()
                .filter(decor_items::Column::UserId.eq(user_id))
                .order_by_asc(decor_items::Column::Category)
                .into_tuple()
                .all(&db_tx)
                .await?;
            Ok(categories)
        })
    }

    pub async fn category_overview(&self, user_id: &str) -> ResultEngine<CategoryOverview> {
        let overview = CategoryOverview::from_present(self.list_categories(user_id).await?);
        if !overview.matches_predefined() {
            tracing::debug!(
                user_id,
                missing = ?overview.missing,
                unexpected = ?overview.unexpected,
                "categories differ from the predefined list"
            );
        }
        Ok(overview)
    }

    /// Add a new decor item. `hired` and `damaged` start at 0.
    pub async fn add_item(&self, user_id: &str, item: NewItem) -> ResultEngine<InventoryItem> {
        let category = normalize_required_text(&item.category, "category")?;
        let item_name = normalize_required_text(&item.item_name, "item name")?;
        ensure_non_negative(item.in_store, "in_store")?;
        ensure_price(item.price)?;

        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let active = decor_items::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id.to_string()),
                category: ActiveValue::Set(category),
                item_name: ActiveValue::Set(item_name),
                in_store: ActiveValue::Set(item.in_store),
                hired: ActiveValue::Set(0),
                damaged: ActiveValue::Set(0),
                price_minor: ActiveValue::Set(item.price.cents()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active.insert(&db_tx).await?;
            tracing::debug!(user_id, item_id = %model.id, "decor item added");
            Ok(InventoryItem::from(model))
        })
    }

    /// Directly overwrite item fields.
    ///
    /// This is the unchecked escape hatch for bulk corrections: counters are
    /// set as given and the total stock may change. Use
    /// [`Engine::apply_action`] for hire/return/damage/repair. Values are
    /// still required to be non-negative and text non-empty.
    pub async fn update_item(
        &self,
        user_id: &str,
        item_id: Uuid,
        patch: ItemPatch,
    ) -> ResultEngine<InventoryItem> {
        if patch.is_empty() {
            return Err(EngineError::InvalidInput(
                "provide at least one field to update".to_string(),
            ));
        }
        let category = patch
            .category
            .as_deref()
            .map(|value| normalize_required_text(value, "category"))
            .transpose()?;
        let item_name = patch
            .item_name
            .as_deref()
            .map(|value| normalize_required_text(value, "item name"))
            .transpose()?;
        for (value, label) in [
            (patch.in_store, "in_store"),
            (patch.hired, "hired"),
            (patch.damaged, "damaged"),
        ] {
            if let Some(value) = value {
                ensure_non_negative(value, label)?;
            }
        }
        if let Some(price) = patch.price {
            ensure_price(price)?;
        }

        with_tx!(self, |db_tx| {
            let model = self.require_item(&db_tx, user_id, item_id).await?;
            let before = model.counts();

            let mut active: decor_items::ActiveModel = model.into();
            if let Some(category) = category {
                active.category = ActiveValue::Set(category);
            }
            if let Some(item_name) = item_name {
                active.item_name = ActiveValue::Set(item_name);
            }
            if let Some(in_store) = patch.in_store {
                active.in_store = ActiveValue::Set(in_store);
            }
            if let Some(hired) = patch.hired {
                active.hired = ActiveValue::Set(hired);
            }
            if let Some(damaged) = patch.damaged {
                active.damaged = ActiveValue::Set(damaged);
            }
            if let Some(price) = patch.price {
                active.price_minor = ActiveValue::Set(price.cents());
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let updated = active.update(&db_tx).await?;
            if updated.counts().total() != before.total() {
                tracing::info!(
                    user_id,
                    %item_id,
                    before = before.total(),
                    after = updated.counts().total(),
                    "direct edit changed total stock"
                );
            }
            Ok(InventoryItem::from(updated))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_reports_missing_and_unexpected() {
        let overview = CategoryOverview::from_present(vec![
            "arches".to_string(),
            "Balloons".to_string(),
        ]);
        assert_eq!(overview.unexpected, vec!["Balloons".to_string()]);
        assert!(!overview.missing.contains(&"Arches".to_string()));
        assert!(overview.missing.contains(&"Lighting".to_string()));
        assert!(!overview.matches_predefined());
    }

    #[test]
    fn overview_matches_when_all_predefined_present() {
        let present = PREDEFINED_CATEGORIES.iter().map(ToString::to_string).collect();
        assert!(CategoryOverview::from_present(present).matches_predefined());
    }
}
