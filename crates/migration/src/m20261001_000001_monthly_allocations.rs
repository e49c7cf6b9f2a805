//! Monthly allocation grid.
//!
//! One row per (tenant, month, year, row_number). Months are stored 1-12.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum MonthlyAllocations {
    Table,
    UserId,
    Month,
    Year,
    RowNumber,
    CustomerName,
    UpdatedAt,
}

/// Decor sub-category quantity columns, in grid order.
const DECOR_COLUMNS: [&str; 26] = [
    "walkway_stands",
    "arc",
    "centerpieces",
    "fairy_lights",
    "chandeliers",
    "uplighters",
    "lanterns",
    "candle_holders",
    "backdrop",
    "stage_decor",
    "chair_covers",
    "chair_sashes",
    "table_runners",
    "table_cloths",
    "charger_plates",
    "flower_stands",
    "artificial_flowers",
    "pillars",
    "drapes",
    "carpet",
    "welcome_board",
    "easels",
    "cake_stands",
    "mirror_plates",
    "hanging_decor",
    "neon_signs",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(MonthlyAllocations::Table)
            .if_not_exists()
            .col(ColumnDef::new(MonthlyAllocations::UserId).string().not_null())
            .col(
                ColumnDef::new(MonthlyAllocations::Month)
                    .integer()
                    .not_null()
                    .check(Expr::col(MonthlyAllocations::Month).between(1, 12)),
            )
            .col(ColumnDef::new(MonthlyAllocations::Year).integer().not_null())
            .col(
                ColumnDef::new(MonthlyAllocations::RowNumber)
                    .integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(MonthlyAllocations::CustomerName)
                    .string()
                    .not_null()
                    .check(Expr::cust("length(trim(customer_name)) > 0")),
            );

        for name in DECOR_COLUMNS {
            table.col(
                ColumnDef::new(Alias::new(name))
                    .integer()
                    .not_null()
                    .default(0)
                    .check(Expr::col(Alias::new(name)).gte(0)),
            );
        }

        table
            .col(
                ColumnDef::new(MonthlyAllocations::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .primary_key(
                Index::create()
                    .col(MonthlyAllocations::UserId)
                    .col(MonthlyAllocations::Month)
                    .col(MonthlyAllocations::Year)
                    .col(MonthlyAllocations::RowNumber),
            );

        manager.create_table(table.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyAllocations::Table).to_owned())
            .await
    }
}
