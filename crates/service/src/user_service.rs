//! User administration: listing, lookup, partial update and activation.
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::user;
use crate::auth::domain::UpdateUserInput;
use crate::auth::password::{hash_password, validate_password};
use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Every user that is not an administrator.
    pub async fn list(&self) -> Result<Vec<user::Model>, ServiceError> {
        self.users.list_non_admin().await
    }

    pub async fn get(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        self.users.get(id).await?.ok_or_else(|| ServiceError::not_found("User"))
    }

    /// Fill-if-missing update. The password is rehashed only when a new one
    /// is supplied.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateUserInput) -> Result<user::Model, ServiceError> {
        let mut u = self.get(id).await?;

        if let Some(name) = present(input.name) {
            u.name = name;
        }
        if let Some(email) = present(input.email) {
            if email != u.email {
                user::validate_email(&email)?;
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(ServiceError::Conflict("Este email ya existe".into()));
                }
                u.email = email;
            }
        }
        if let Some(password) = present(input.password) {
            validate_password(&password).map_err(|e| ServiceError::Validation(e.to_string()))?;
            u.password = Some(hash_password(&password).map_err(|e| ServiceError::Db(e.to_string()))?);
        }
        for (incoming, stored) in [
            (input.cod_area, &mut u.cod_area),
            (input.phone, &mut u.phone),
            (input.city, &mut u.city),
            (input.country, &mut u.country),
        ] {
            if let Some(v) = present(incoming) {
                *stored = Some(v);
            }
        }
        if let Some(is_admin) = input.is_admin {
            u.is_admin = is_admin;
        }
        if let Some(is_active) = input.is_active {
            u.is_active = is_active;
        }
        u.updated_at = Utc::now().into();

        let saved = self.users.save(u).await?;
        info!(user_id = %saved.id, "user_updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        let mut u = self.get(id).await?;
        u.is_active = !u.is_active;
        u.updated_at = Utc::now().into();
        let saved = self.users.save(u).await?;
        info!(user_id = %saved.id, is_active = saved.is_active, "user_toggled");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn list_hides_admins() {
        let store = Arc::new(MemoryStore::default());
        let svc = UserService::new(store.clone());
        let admin = store.seed_user("Admin", "admin@example.com").await;
        store.seed_user("Eva", "eva@example.com").await;
        svc.update(admin.id, UpdateUserInput { is_admin: Some(true), ..Default::default() }).await.unwrap();

        let users = svc.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "eva@example.com");
    }

    #[tokio::test]
    async fn update_keeps_absent_fields_and_rehashes_only_new_passwords() {
        let store = Arc::new(MemoryStore::default());
        let svc = UserService::new(store.clone());
        let u = store.seed_user("Eva Luna", "eva@example.com").await;

        let updated = svc
            .update(u.id, UpdateUserInput { city: Some("Sucre".into()), name: Some("".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "Eva Luna");
        assert_eq!(updated.city.as_deref(), Some("Sucre"));
        assert!(updated.password.is_none());

        let with_pw = svc
            .update(u.id, UpdateUserInput { password: Some("NuevaClave1".into()), ..Default::default() })
            .await
            .unwrap();
        let phc = with_pw.password.clone().unwrap();
        assert!(verify_password("NuevaClave1", &phc).unwrap());

        let again = svc.update(u.id, UpdateUserInput { phone: Some("777".into()), ..Default::default() }).await.unwrap();
        assert_eq!(again.password.as_deref(), Some(phc.as_str()));
    }

    #[tokio::test]
    async fn email_clash_and_missing_user() {
        let store = Arc::new(MemoryStore::default());
        let svc = UserService::new(store.clone());
        let a = store.seed_user("A", "a@example.com").await;
        store.seed_user("B", "b@example.com").await;
        let err = svc
            .update(a.id, UpdateUserInput { email: Some("b@example.com".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert!(matches!(svc.get(Uuid::new_v4()).await.unwrap_err(), ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn toggle_twice_restores_state() {
        let store = Arc::new(MemoryStore::default());
        let svc = UserService::new(store.clone());
        let u = store.seed_user("T", "t@example.com").await;
        assert!(!svc.toggle_active(u.id).await.unwrap().is_active);
        assert!(svc.toggle_active(u.id).await.unwrap().is_active);
    }
}
