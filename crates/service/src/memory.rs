//! In-memory implementation of every repository trait.
//!
//! Mirrors the relational behavior the services rely on: creation order,
//! unique emails, and comments losing their listing FK when it is deleted.
//! Backs unit tests, router tests and doc examples.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use models::{comment, user, Listing, ListingKind};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repository::UserRepository;
use crate::comment::CommentRepository;
use crate::errors::ServiceError;
use crate::listing::{ListingFilter, ListingRepository};
use crate::pagination::Pagination;

#[derive(Default)]
pub struct MemoryStore {
    listings: RwLock<HashMap<ListingKind, Vec<Listing>>>,
    comments: RwLock<Vec<comment::Model>>,
    users: RwLock<Vec<user::Model>>,
}

impl MemoryStore {
    /// Add a password-less user directly, bypassing signup.
    pub async fn seed_user(&self, name: &str, email: &str) -> user::Model {
        let now = Utc::now().into();
        let u = user::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password: None,
            cod_area: None,
            phone: None,
            city: None,
            country: None,
            is_admin: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.users.write().await.push(u.clone());
        u
    }
}

fn sorted(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    listings
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn search_active(
        &self,
        kind: ListingKind,
        filter: &ListingFilter,
        page: Option<Pagination>,
    ) -> Result<Vec<Listing>, ServiceError> {
        let guard = self.listings.read().await;
        let matching: Vec<Listing> = guard
            .get(&kind)
            .map(|all| all.iter().filter(|l| filter.matches(l)).cloned().collect())
            .unwrap_or_default();
        let matching = sorted(matching);
        Ok(match page {
            Some(p) => matching.into_iter().skip(p.offset() as usize).take(p.limit() as usize).collect(),
            None => matching,
        })
    }

    async fn count_active(&self, kind: ListingKind, filter: &ListingFilter) -> Result<u64, ServiceError> {
        let guard = self.listings.read().await;
        Ok(guard.get(&kind).map(|all| all.iter().filter(|l| filter.matches(l)).count()).unwrap_or(0) as u64)
    }

    async fn list_by_owner(&self, kind: ListingKind, user_id: Uuid) -> Result<Vec<Listing>, ServiceError> {
        let guard = self.listings.read().await;
        let owned = guard
            .get(&kind)
            .map(|all| all.iter().filter(|l| l.user_id == user_id).cloned().collect())
            .unwrap_or_default();
        Ok(sorted(owned))
    }

    async fn get(&self, kind: ListingKind, id: Uuid) -> Result<Option<Listing>, ServiceError> {
        let guard = self.listings.read().await;
        Ok(guard.get(&kind).and_then(|all| all.iter().find(|l| l.id == id).cloned()))
    }

    async fn insert(&self, kind: ListingKind, listing: &Listing) -> Result<Listing, ServiceError> {
        self.listings.write().await.entry(kind).or_default().push(listing.clone());
        Ok(listing.clone())
    }

    async fn save(&self, kind: ListingKind, listing: &Listing) -> Result<Listing, ServiceError> {
        let mut guard = self.listings.write().await;
        let slot = guard
            .get_mut(&kind)
            .and_then(|all| all.iter_mut().find(|l| l.id == listing.id))
            .ok_or_else(|| ServiceError::not_found(kind.label()))?;
        *slot = listing.clone();
        Ok(listing.clone())
    }

    async fn delete(&self, kind: ListingKind, id: Uuid) -> Result<bool, ServiceError> {
        let removed = {
            let mut guard = self.listings.write().await;
            match guard.get_mut(&kind) {
                Some(all) => {
                    let before = all.len();
                    all.retain(|l| l.id != id);
                    all.len() != before
                }
                None => false,
            }
        };
        if removed {
            for c in self.comments.write().await.iter_mut() {
                if c.listing_ref() == Some((kind, id)) {
                    c.clear_listing();
                }
            }
        }
        Ok(removed)
    }

    async fn average_stars(
        &self,
        kind: ListingKind,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Option<f64>>, ServiceError> {
        let comments = self.comments.read().await;
        Ok(ids
            .iter()
            .map(|id| {
                let stars: Vec<f64> = comments
                    .iter()
                    .filter(|c| c.listing_ref() == Some((kind, *id)))
                    .map(|c| c.stars)
                    .collect();
                let avg = (!stars.is_empty()).then(|| stars.iter().sum::<f64>() / stars.len() as f64);
                (*id, avg)
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<comment::Model>, ServiceError> {
        Ok(self.comments.read().await.clone())
    }

    async fn list_for_listing(
        &self,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<Vec<(comment::Model, Option<String>)>, ServiceError> {
        let comments = self.comments.read().await;
        let users = self.users.read().await;
        Ok(comments
            .iter()
            .filter(|c| c.listing_ref() == Some((kind, listing_id)))
            .map(|c| {
                let author = c.user_id.and_then(|uid| users.iter().find(|u| u.id == uid)).map(|u| u.name.clone());
                (c.clone(), author)
            })
            .collect())
    }

    async fn insert(&self, comment: comment::Model) -> Result<comment::Model, ServiceError> {
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut guard = self.comments.write().await;
        let before = guard.len();
        guard.retain(|c| c.id != id);
        Ok(guard.len() != before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn get(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn list_non_admin(&self) -> Result<Vec<user::Model>, ServiceError> {
        Ok(self.users.read().await.iter().filter(|u| !u.is_admin).cloned().collect())
    }

    async fn insert(&self, user: user::Model) -> Result<user::Model, ServiceError> {
        let mut guard = self.users.write().await;
        if guard.iter().any(|u| u.email == user.email) {
            return Err(ServiceError::Conflict("Este email ya existe".into()));
        }
        guard.push(user.clone());
        Ok(user)
    }

    async fn save(&self, user: user::Model) -> Result<user::Model, ServiceError> {
        let mut guard = self.users.write().await;
        let slot = guard
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| ServiceError::not_found("User"))?;
        *slot = user.clone();
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deleting_a_listing_detaches_its_comments() {
        let store = MemoryStore::default();
        let now = Utc::now().into();
        let listing = Listing {
            id: Uuid::new_v4(),
            name: "Farmacia Chavez".into(),
            location: models::Location { latitude: 0.0, longitude: 0.0 },
            images: vec![],
            offers: vec![],
            cod_area: None,
            phone: None,
            city: None,
            country: None,
            web: None,
            time: models::Schedule { weekdays: "24h".into(), weekends: "24h".into() },
            zone: models::Zone::Central,
            categories: Some(vec!["Farmacias".into()]),
            is_active: true,
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        ListingRepository::insert(&store, ListingKind::Emergency, &listing).await.unwrap();
        let mut c = comment::Model {
            id: Uuid::new_v4(),
            comments: "rapido".into(),
            stars: 5.0,
            user_id: None,
            restaurant_id: None,
            hotel_id: None,
            taxi_id: None,
            gym_id: None,
            supermarket_id: None,
            tourism_id: None,
            movie_theater_id: None,
            emergency_id: None,
            is_anonymous: true,
            created_at: now,
            updated_at: now,
        };
        c.set_listing(ListingKind::Emergency, listing.id);
        CommentRepository::insert(&store, c).await.unwrap();

        assert!(ListingRepository::delete(&store, ListingKind::Emergency, listing.id).await.unwrap());
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].listing_ref(), None);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::default();
        let u = store.seed_user("Ana", "ana@example.com").await;
        let mut dup = u.clone();
        dup.id = Uuid::new_v4();
        let err = UserRepository::insert(&store, dup).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
