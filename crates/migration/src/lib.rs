//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000001_create_users;
mod m20220101_000002_create_listings;
mod m20220101_000003_create_comments;
mod m20220101_000004_add_indexes;

/// Table name of every listing kind, in creation order.
pub const LISTING_TABLES: [&str; 8] = [
    "restaurants",
    "hotels",
    "taxis",
    "gyms",
    "supermarkets",
    "tourisms",
    "movie_theaters",
    "emergencies",
];

/// Foreign-key column on `comments` for the listing table at the same index.
pub const COMMENT_LISTING_COLUMNS: [&str; 8] = [
    "restaurant_id",
    "hotel_id",
    "taxi_id",
    "gym_id",
    "supermarket_id",
    "tourism_id",
    "movie_theater_id",
    "emergency_id",
];

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000001_create_users::Migration),
            Box::new(m20220101_000002_create_listings::Migration),
            Box::new(m20220101_000003_create_comments::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000004_add_indexes::Migration),
        ]
    }
}
