use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::{comment, user, ListingKind};

use crate::comment::repository::CommentRepository;
use crate::errors::ServiceError;

pub struct SeaOrmCommentRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn list_all(&self) -> Result<Vec<comment::Model>, ServiceError> {
        let rows = comment::Entity::find()
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn list_for_listing(
        &self,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<Vec<(comment::Model, Option<String>)>, ServiceError> {
        let rows = comment::Entity::find()
            .filter(comment::listing_column(kind).eq(listing_id))
            .find_also_related(user::Entity)
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(c, u)| (c, u.map(|u| u.name))).collect())
    }

    async fn insert(&self, comment: comment::Model) -> Result<comment::Model, ServiceError> {
        let saved = comment.into_active_model().reset_all().insert(&self.db).await?;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = comment::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
