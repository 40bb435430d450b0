//! Create one table per listing kind.
//!
//! All kinds share the same shape; `categories` stays an empty array for
//! kinds without a category enumeration.
use sea_orm_migration::{prelude::*, schema::*};

use crate::LISTING_TABLES;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn listing_table(name: &str) -> TableCreateStatement {
    let table = Alias::new(name);
    Table::create()
        .table(table.clone())
        .if_not_exists()
        .col(uuid(Listing::Id).primary_key())
        .col(string_len(Listing::Name, 255).not_null())
        .col(json_binary(Listing::Location).not_null())
        .col(array(Listing::Images, ColumnType::Text).default(Expr::cust("'{}'")))
        .col(array(Listing::Offers, ColumnType::Text).default(Expr::cust("'{}'")))
        .col(string_len_null(Listing::CodArea, 16))
        .col(string_len_null(Listing::Phone, 32))
        .col(string_len_null(Listing::City, 128))
        .col(string_len_null(Listing::Country, 128))
        .col(string_len_null(Listing::Web, 512))
        .col(json_binary(Listing::Time).not_null())
        .col(string_len(Listing::Zone, 16).default("Central"))
        .col(array(Listing::Categories, ColumnType::Text).default(Expr::cust("'{}'")))
        .col(boolean(Listing::IsActive).default(true))
        .col(uuid(Listing::UserId).not_null())
        .col(timestamp_with_time_zone(Listing::CreatedAt).not_null())
        .col(timestamp_with_time_zone(Listing::UpdatedAt).not_null())
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_user"))
                .from(table, Listing::UserId)
                .to(Users::Table, Users::Id)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in LISTING_TABLES {
            manager.create_table(listing_table(name)).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in LISTING_TABLES.iter().rev() {
            manager
                .drop_table(Table::drop().table(Alias::new(*name)).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Listing {
    Id,
    Name,
    Location,
    Images,
    Offers,
    CodArea,
    Phone,
    City,
    Country,
    Web,
    Time,
    Zone,
    Categories,
    IsActive,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
