use std::collections::HashSet;

use sea_orm::{
    Iterable, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::OnConflict,
};

use crate::{
    AllocationRow, EngineError, MonthKey, ResultEngine,
    monthly_allocations::{self, active_model},
};

use super::{Engine, with_tx};

fn validate_row(row: &AllocationRow) -> ResultEngine<()> {
    if row.row_number < 1 {
        return Err(EngineError::InvalidInput(format!(
            "row_number must be at least 1, got {}",
            row.row_number
        )));
    }
    row.quantities.validate()
}

impl Engine {
    /// Rows saved for a month, ordered by `row_number`.
    pub async fn list_month(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
    ) -> ResultEngine<Vec<AllocationRow>> {
        let key = MonthKey::new(month, year)?;
        with_tx!(self, |db_tx| {
            let rows = monthly_allocations::Entity::find()
                .filter(monthly_allocations::Column::UserId.eq(user_id))
                .filter(monthly_allocations::Column::Month.eq(key.month()))
                .filter(monthly_allocations::Column::Year.eq(key.year()))
                .order_by_asc(monthly_allocations::Column::RowNumber)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(AllocationRow::from)
                .collect();
            Ok(rows)
        })
    }

    /// Replace the whole month with `rows`.
    ///
    /// Inside one transaction every stored row of the month is deleted and
    /// the rows with a customer name are inserted. Rows not present in `rows`
    /// are gone afterwards. Returns how many rows were stored.
    pub async fn save_month(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
        rows: Vec<AllocationRow>,
    ) -> ResultEngine<usize> {
        let key = MonthKey::new(month, year)?;
        let mut seen = HashSet::new();
        for row in rows.iter().filter(|row| !row.is_blank()) {
            validate_row(row)?;
            if !seen.insert(row.row_number) {
                return Err(EngineError::InvalidInput(format!(
                    "duplicate row_number {}",
                    row.row_number
                )));
            }
        }

        let submitted = rows.len();
        let to_store: Vec<_> = rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| active_model(user_id, key, row))
            .collect();
        let stored = to_store.len();

        with_tx!(self, |db_tx| {
            let deleted = monthly_allocations::Entity::delete_many()
                .filter(monthly_allocations::Column::UserId.eq(user_id))
                .filter(monthly_allocations::Column::Month.eq(key.month()))
                .filter(monthly_allocations::Column::Year.eq(key.year()))
                .exec(&db_tx)
                .await?;

            if !to_store.is_empty() {
                monthly_allocations::Entity::insert_many(to_store)
                    .exec_without_returning(&db_tx)
                    .await?;
            }

            tracing::debug!(
                user_id,
                month = key.month(),
                year = key.year(),
                deleted = deleted.rows_affected,
                submitted,
                stored,
                "monthly allocations replaced"
            );
            Ok(stored)
        })
    }

    /// Insert or overwrite a single row, leaving the rest of the month alone.
    pub async fn upsert_allocation_row(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
        row: AllocationRow,
    ) -> ResultEngine<AllocationRow> {
        let key = MonthKey::new(month, year)?;
        validate_row(&row)?;
        if row.is_blank() {
            return Err(EngineError::InvalidInput(
                "customer name must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let update_columns: Vec<monthly_allocations::Column> = monthly_allocations::Column::iter()
                .filter(|column| !column.is_key())
                .collect();
            monthly_allocations::Entity::insert(active_model(user_id, key, &row))
                .on_conflict(
                    OnConflict::columns([
                        monthly_allocations::Column::UserId,
                        monthly_allocations::Column::Month,
                        monthly_allocations::Column::Year,
                        monthly_allocations::Column::RowNumber,
                    ])
                    .update_columns(update_columns)
                    .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;

            let stored = monthly_allocations::Entity::find_by_id((
                user_id.to_string(),
                key.month(),
                key.year(),
                row.row_number,
            ))
            .one(&db_tx)
            .await?
            .ok_or_else(|| EngineError::Conflict("allocation row vanished after upsert".to_string()))?;
            Ok(AllocationRow::from(stored))
        })
    }
}
