use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use models::user;

use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        let res = user::Entity::find()
            .filter(user::Column::Email.eq(email.to_string()))
            .one(&self.db)
            .await?;
        Ok(res)
    }

    async fn get(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_non_admin(&self) -> Result<Vec<user::Model>, ServiceError> {
        let users = user::Entity::find()
            .filter(user::Column::IsAdmin.eq(false))
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    async fn insert(&self, user: user::Model) -> Result<user::Model, ServiceError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(ServiceError::Conflict("Este email ya existe".into()));
        }
        let created = user.into_active_model().reset_all().insert(&self.db).await?;
        Ok(created)
    }

    async fn save(&self, user: user::Model) -> Result<user::Model, ServiceError> {
        let updated = user.into_active_model().reset_all().update(&self.db).await?;
        Ok(updated)
    }
}
