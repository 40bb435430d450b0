//! Create `comments` table with one nullable FK per listing kind.
//!
//! Deleting a listing nulls the matching FK; deleting a user nulls `user_id`.
use sea_orm_migration::{prelude::*, schema::*};

use crate::{COMMENT_LISTING_COLUMNS, LISTING_TABLES};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Comments::Table)
            .if_not_exists()
            .col(uuid(Comments::Id).primary_key())
            .col(text(Comments::Comments).not_null())
            .col(double(Comments::Stars).not_null())
            .col(uuid_null(Comments::UserId))
            .col(boolean(Comments::IsAnonymous).default(false))
            .col(timestamp_with_time_zone(Comments::CreatedAt).not_null())
            .col(timestamp_with_time_zone(Comments::UpdatedAt).not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_comments_user")
                    .from(Comments::Table, Comments::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::Cascade),
            );

        for (listing_table, fk_column) in LISTING_TABLES.iter().zip(COMMENT_LISTING_COLUMNS) {
            table.col(uuid_null(Alias::new(fk_column))).foreign_key(
                ForeignKey::create()
                    .name(format!("fk_comments_{fk_column}"))
                    .from(Comments::Table, Alias::new(fk_column))
                    .to(Alias::new(*listing_table), Alias::new("id"))
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::Cascade),
            );
        }

        manager.create_table(table.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Comments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Comments,
    Stars,
    UserId,
    IsAnonymous,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
