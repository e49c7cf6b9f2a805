//! Inventory schema.
//!
//! - `customers`: tenant-scoped customer directory referenced by requirements
//! - `decor_items`: decor stock with the `in_store` / `hired` / `damaged` counters
//! - `customer_requirements`: per-customer demand, unique per (tenant, customer, item)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    UserId,
    Name,
    Phone,
    Email,
    CreatedAt,
}

#[derive(Iden)]
enum DecorItems {
    Table,
    Id,
    UserId,
    Category,
    ItemName,
    InStore,
    Hired,
    Damaged,
    PriceMinor,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CustomerRequirements {
    Table,
    Id,
    UserId,
    CustomerId,
    DecorItemId,
    QuantityRequired,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::UserId).string().not_null())
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string())
                    .col(ColumnDef::new(Customers::Email).string())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-customers-user_id")
                    .table(Customers::Table)
                    .col(Customers::UserId)
                    .to_owned(),
            )
            .await?;

        // Counters and price carry CHECK constraints so even direct edits
        // cannot persist negative stock.
        manager
            .create_table(
                Table::create()
                    .table(DecorItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DecorItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DecorItems::UserId).string().not_null())
                    .col(ColumnDef::new(DecorItems::Category).string().not_null())
                    .col(ColumnDef::new(DecorItems::ItemName).string().not_null())
                    .col(
                        ColumnDef::new(DecorItems::InStore)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(DecorItems::InStore).gte(0)),
                    )
                    .col(
                        ColumnDef::new(DecorItems::Hired)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(DecorItems::Hired).gte(0)),
                    )
                    .col(
                        ColumnDef::new(DecorItems::Damaged)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(DecorItems::Damaged).gte(0)),
                    )
                    .col(
                        ColumnDef::new(DecorItems::PriceMinor)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(DecorItems::PriceMinor).gte(0)),
                    )
                    .col(
                        ColumnDef::new(DecorItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DecorItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-decor_items-user_id-category")
                    .table(DecorItems::Table)
                    .col(DecorItems::UserId)
                    .col(DecorItems::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerRequirements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerRequirements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerRequirements::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerRequirements::CustomerId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerRequirements::DecorItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerRequirements::QuantityRequired)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(CustomerRequirements::QuantityRequired).gte(1)),
                    )
                    .col(
                        ColumnDef::new(CustomerRequirements::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(CustomerRequirements::Notes).string())
                    .col(
                        ColumnDef::new(CustomerRequirements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerRequirements::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-customer_requirements-customer_id")
                            .from(CustomerRequirements::Table, CustomerRequirements::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-customer_requirements-decor_item_id")
                            .from(
                                CustomerRequirements::Table,
                                CustomerRequirements::DecorItemId,
                            )
                            .to(DecorItems::Table, DecorItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Business key backing the accumulating upsert.
        manager
            .create_index(
                Index::create()
                    .name("idx-customer_requirements-business_key")
                    .table(CustomerRequirements::Table)
                    .col(CustomerRequirements::UserId)
                    .col(CustomerRequirements::CustomerId)
                    .col(CustomerRequirements::DecorItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerRequirements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DecorItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        Ok(())
    }
}
