use std::collections::HashMap;

use async_trait::async_trait;
use models::{Listing, ListingKind};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Predicate over active listings.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingFilter {
    /// Case-insensitive substring match on the name; empty matches all.
    NameContains(String),
    /// Category set intersects the given values.
    CategoriesOverlap(Vec<String>),
}

impl ListingFilter {
    /// Evaluate the filter against an in-memory listing.
    pub fn matches(&self, listing: &Listing) -> bool {
        if !listing.is_active {
            return false;
        }
        match self {
            ListingFilter::NameContains(needle) => {
                listing.name.to_lowercase().contains(&needle.to_lowercase())
            }
            ListingFilter::CategoriesOverlap(wanted) => listing
                .categories
                .as_ref()
                .is_some_and(|have| have.iter().any(|c| wanted.contains(c))),
        }
    }
}

/// Persistence for every listing table. `kind` selects the table.
///
/// Result sets are ordered by creation time, then id.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn search_active(
        &self,
        kind: ListingKind,
        filter: &ListingFilter,
        page: Option<Pagination>,
    ) -> Result<Vec<Listing>, ServiceError>;

    async fn count_active(&self, kind: ListingKind, filter: &ListingFilter) -> Result<u64, ServiceError>;

    async fn list_by_owner(&self, kind: ListingKind, user_id: Uuid) -> Result<Vec<Listing>, ServiceError>;

    async fn get(&self, kind: ListingKind, id: Uuid) -> Result<Option<Listing>, ServiceError>;

    async fn insert(&self, kind: ListingKind, listing: &Listing) -> Result<Listing, ServiceError>;

    /// Overwrite every mutable column of an existing listing.
    async fn save(&self, kind: ListingKind, listing: &Listing) -> Result<Listing, ServiceError>;

    /// Returns false when no row had that id.
    async fn delete(&self, kind: ListingKind, id: Uuid) -> Result<bool, ServiceError>;

    /// Mean comment stars per listing id, in a single aggregation. Ids without
    /// comments map to `None`.
    async fn average_stars(
        &self,
        kind: ListingKind,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Option<f64>>, ServiceError>;
}
