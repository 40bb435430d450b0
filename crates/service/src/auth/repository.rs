use async_trait::async_trait;
use models::user;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError>;
    async fn list_non_admin(&self) -> Result<Vec<user::Model>, ServiceError>;
    /// `Conflict` when the email is taken.
    async fn insert(&self, user: user::Model) -> Result<user::Model, ServiceError>;
    async fn save(&self, user: user::Model) -> Result<user::Model, ServiceError>;
}
