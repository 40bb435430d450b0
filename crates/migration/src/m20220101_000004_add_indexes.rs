use sea_orm_migration::prelude::*;

use crate::{COMMENT_LISTING_COLUMNS, LISTING_TABLES};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in LISTING_TABLES {
            // Listing: owner lookups and the active-listing scan
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{name}_user"))
                        .table(Alias::new(name))
                        .col(Listing::UserId)
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{name}_active"))
                        .table(Alias::new(name))
                        .col(Listing::IsActive)
                        .to_owned(),
                )
                .await?;
        }

        // Comments: one index per listing FK, used by the rating join
        for column in COMMENT_LISTING_COLUMNS {
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_comments_{column}"))
                        .table(Comments::Table)
                        .col(Alias::new(column))
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in COMMENT_LISTING_COLUMNS {
            manager
                .drop_index(Index::drop().name(format!("idx_comments_{column}")).table(Comments::Table).to_owned())
                .await?;
        }
        for name in LISTING_TABLES {
            manager
                .drop_index(Index::drop().name(format!("idx_{name}_active")).table(Alias::new(name)).to_owned())
                .await?;
            manager
                .drop_index(Index::drop().name(format!("idx_{name}_user")).table(Alias::new(name)).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Listing { UserId, IsActive }

#[derive(DeriveIden)]
enum Comments { Table }
