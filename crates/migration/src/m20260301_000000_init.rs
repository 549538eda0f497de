//! Initial schema migration - creates all tables from scratch.
//!
//! The complete schema for Kakeibo:
//!
//! - `cards`: payment instruments expenses are attributed to
//! - `categories`: spending classifications, optionally flagged shared
//! - `expenses`: dated transactions referencing one card and one category
//!
//! The storage layer cascades expense deletion for cards and restricts it for
//! categories; the application refuses both while dependent expenses exist.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Cards {
    Table,
    Id,
    Name,
    Color,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    Color,
    IsShared,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Amount,
    Date,
    Description,
    CardId,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Cards
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cards::Name).string().not_null())
                    .col(
                        ColumnDef::new(Cards::Color)
                            .string()
                            .not_null()
                            .default("#3B82F6"),
                    )
                    .col(ColumnDef::new(Cards::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Cards::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::Color)
                            .string()
                            .not_null()
                            .default("#10B981"),
                    )
                    .col(
                        ColumnDef::new(Categories::IsShared)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Categories::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Categories::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-name-unique")
                    .table(Categories::Table)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Expenses::Amount)
                            .double()
                            .not_null()
                            .check(Expr::col(Expenses::Amount).gt(0)),
                    )
                    .col(ColumnDef::new(Expenses::Date).timestamp().not_null())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(ColumnDef::new(Expenses::CardId).uuid().not_null())
                    .col(ColumnDef::new(Expenses::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Expenses::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-card_id")
                            .from(Expenses::Table, Expenses::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-category_id")
                            .from(Expenses::Table, Expenses::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-date")
                    .table(Expenses::Table)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-card_id")
                    .table(Expenses::Table)
                    .col(Expenses::CardId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-category_id")
                    .table(Expenses::Table)
                    .col(Expenses::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await?;
        Ok(())
    }
}
