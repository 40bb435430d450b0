use async_trait::async_trait;
use models::{comment, ListingKind};
use uuid::Uuid;

use crate::errors::ServiceError;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<comment::Model>, ServiceError>;

    /// Comments of one listing, each paired with its author's name when the
    /// author still exists.
    async fn list_for_listing(
        &self,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<Vec<(comment::Model, Option<String>)>, ServiceError>;

    async fn insert(&self, comment: comment::Model) -> Result<comment::Model, ServiceError>;

    /// Returns false when no comment had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
