use std::sync::Arc;

use chrono::Utc;
use models::{comment, ListingKind};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, instrument};
use uuid::Uuid;

use super::repository::CommentRepository;
use crate::errors::ServiceError;
use crate::listing::ListingRepository;

pub const ANONYMOUS_NAME: &str = "Anónimo";
pub const MAX_STARS: f64 = 5.0;

/// Clients send `""` for "no user"; treat it like a missing field.
fn blank_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Uuid>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Body of `POST /comments`. Exactly one `<kind>_id` must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCommentInput {
    pub comments: String,
    pub stars: f64,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub restaurant_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub hotel_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub taxi_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gym_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub supermarket_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tourism_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub movie_theater_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub emergency_id: Option<Uuid>,
}

impl CreateCommentInput {
    pub fn new(comments: &str, stars: f64) -> Self {
        Self { comments: comments.to_string(), stars, ..Self::default() }
    }

    fn target(&self) -> Result<(ListingKind, Uuid), ServiceError> {
        let set: Vec<(ListingKind, Uuid)> = [
            (ListingKind::Restaurant, self.restaurant_id),
            (ListingKind::Hotel, self.hotel_id),
            (ListingKind::Taxi, self.taxi_id),
            (ListingKind::Gym, self.gym_id),
            (ListingKind::Supermarket, self.supermarket_id),
            (ListingKind::Tourism, self.tourism_id),
            (ListingKind::MovieTheater, self.movie_theater_id),
            (ListingKind::Emergency, self.emergency_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id)))
        .collect();
        match set.as_slice() {
            [one] => Ok(*one),
            [] => Err(ServiceError::validation("a listing id is required")),
            _ => Err(ServiceError::validation("a comment belongs to exactly one listing")),
        }
    }
}

/// Name shown next to a comment: the author's first name, or
/// [`ANONYMOUS_NAME`] when the comment is anonymous or the author is gone.
pub fn display_name(is_anonymous: bool, author: Option<&str>) -> String {
    match author {
        Some(name) if !is_anonymous => name.split_whitespace().next().unwrap_or(ANONYMOUS_NAME).to_string(),
        _ => ANONYMOUS_NAME.to_string(),
    }
}

/// A comment as listed under its listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentView {
    pub id: Uuid,
    pub comments: String,
    pub stars: f64,
    pub kind: ListingKind,
    pub listing_id: Uuid,
    pub is_anonymous: bool,
    pub user_name: String,
}

impl Serialize for CommentView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("comments", &self.comments)?;
        map.serialize_entry("stars", &self.stars)?;
        map.serialize_entry(self.kind.foreign_key(), &self.listing_id)?;
        map.serialize_entry("isAnonymous", &self.is_anonymous)?;
        map.serialize_entry("userName", &self.user_name)?;
        map.end()
    }
}

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, listings: Arc<dyn ListingRepository>) -> Self {
        Self { comments, listings }
    }

    pub async fn list_all(&self) -> Result<Vec<comment::Model>, ServiceError> {
        self.comments.list_all().await
    }

    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn list_for_listing(&self, kind: ListingKind, listing_id: Uuid) -> Result<Vec<CommentView>, ServiceError> {
        let rows = self.comments.list_for_listing(kind, listing_id).await?;
        Ok(rows
            .into_iter()
            .map(|(c, author)| CommentView {
                id: c.id,
                user_name: display_name(c.is_anonymous, author.as_deref()),
                comments: c.comments,
                stars: c.stars,
                kind,
                listing_id,
                is_anonymous: c.is_anonymous,
            })
            .collect())
    }

    /// Store a comment. It is anonymous exactly when no `user_id` was given.
    #[instrument(skip(self, input), fields(stars = input.stars, anonymous = input.user_id.is_none()))]
    pub async fn create(&self, input: CreateCommentInput) -> Result<comment::Model, ServiceError> {
        let body = input.comments.trim();
        if body.is_empty() {
            return Err(ServiceError::validation("comments is required"));
        }
        if !input.stars.is_finite() || !(0.0..=MAX_STARS).contains(&input.stars) {
            return Err(ServiceError::validation(format!("stars must be between 0 and {MAX_STARS}")));
        }
        let (kind, listing_id) = input.target()?;
        if self.listings.get(kind, listing_id).await?.is_none() {
            return Err(ServiceError::not_found(kind.label()));
        }

        let now = Utc::now().into();
        let mut model = comment::Model {
            id: Uuid::new_v4(),
            comments: body.to_string(),
            stars: input.stars,
            user_id: input.user_id,
            restaurant_id: None,
            hotel_id: None,
            taxi_id: None,
            gym_id: None,
            supermarket_id: None,
            tourism_id: None,
            movie_theater_id: None,
            emergency_id: None,
            is_anonymous: input.user_id.is_none(),
            created_at: now,
            updated_at: now,
        };
        model.set_listing(kind, listing_id);

        let saved = self.comments.insert(model).await?;
        common::metrics::COMMENTS_CREATED_TOTAL.inc();
        info!(id = %saved.id, %listing_id, kind = %kind, "comment_created");
        Ok(saved)
    }

    /// Hard delete. No ownership check is made.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.comments.delete(id).await? {
            return Err(ServiceError::not_found("Comment"));
        }
        info!(%id, "comment_deleted");
        Ok(())
    }
}
