//! Create `users` table.
//!
//! `password` is nullable: accounts created through Google sign-in have none.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::Name, 255).not_null())
                    .col(string_len(Users::Email, 255).unique_key().not_null())
                    .col(string_len_null(Users::Password, 255))
                    .col(string_len_null(Users::CodArea, 16))
                    .col(string_len_null(Users::Phone, 32))
                    .col(string_len_null(Users::City, 128))
                    .col(string_len_null(Users::Country, 128))
                    .col(boolean(Users::IsAdmin).default(false))
                    .col(boolean(Users::IsActive).default(true))
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Users::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Password,
    CodArea,
    Phone,
    City,
    Country,
    IsAdmin,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
