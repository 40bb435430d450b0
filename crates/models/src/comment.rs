use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::listing::ListingKind;

/// A rating left on exactly one listing. Listing FKs that are not set are
/// omitted from the JSON form.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub comments: String,
    #[sea_orm(column_type = "Double")]
    pub stars: f64,
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub restaurant_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hotel_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub taxi_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gym_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub supermarket_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tourism_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub movie_theater_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub emergency_id: Option<Uuid>,
    #[serde(rename = "isAnonymous")]
    pub is_anonymous: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTimeWithTimeZone,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// FK column on `comments` pointing at a listing of `kind`.
pub fn listing_column(kind: ListingKind) -> Column {
    match kind {
        ListingKind::Restaurant => Column::RestaurantId,
        ListingKind::Hotel => Column::HotelId,
        ListingKind::Taxi => Column::TaxiId,
        ListingKind::Gym => Column::GymId,
        ListingKind::Supermarket => Column::SupermarketId,
        ListingKind::Tourism => Column::TourismId,
        ListingKind::MovieTheater => Column::MovieTheaterId,
        ListingKind::Emergency => Column::EmergencyId,
    }
}

impl Model {
    /// The listing this comment belongs to, if its FK is still set.
    pub fn listing_ref(&self) -> Option<(ListingKind, Uuid)> {
        let slots = [
            (ListingKind::Restaurant, self.restaurant_id),
            (ListingKind::Hotel, self.hotel_id),
            (ListingKind::Taxi, self.taxi_id),
            (ListingKind::Gym, self.gym_id),
            (ListingKind::Supermarket, self.supermarket_id),
            (ListingKind::Tourism, self.tourism_id),
            (ListingKind::MovieTheater, self.movie_theater_id),
            (ListingKind::Emergency, self.emergency_id),
        ];
        slots.into_iter().find_map(|(kind, id)| id.map(|id| (kind, id)))
    }

    /// Detach the comment from its listing, as `ON DELETE SET NULL` does.
    pub fn clear_listing(&mut self) {
        self.restaurant_id = None;
        self.hotel_id = None;
        self.taxi_id = None;
        self.gym_id = None;
        self.supermarket_id = None;
        self.tourism_id = None;
        self.movie_theater_id = None;
        self.emergency_id = None;
    }

    /// Point the comment at `listing_id` of `kind`, clearing the other FKs.
    pub fn set_listing(&mut self, kind: ListingKind, listing_id: Uuid) {
        self.clear_listing();
        let slot = match kind {
            ListingKind::Restaurant => &mut self.restaurant_id,
            ListingKind::Hotel => &mut self.hotel_id,
            ListingKind::Taxi => &mut self.taxi_id,
            ListingKind::Gym => &mut self.gym_id,
            ListingKind::Supermarket => &mut self.supermarket_id,
            ListingKind::Tourism => &mut self.tourism_id,
            ListingKind::MovieTheater => &mut self.movie_theater_id,
            ListingKind::Emergency => &mut self.emergency_id,
        };
        *slot = Some(listing_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Model {
        let now = chrono::Utc::now().into();
        Model {
            id: Uuid::new_v4(),
            comments: "Muy rico".into(),
            stars: 4.0,
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
        }
    }

    #[test]
    fn set_listing_keeps_a_single_fk() {
        let mut c = blank();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        c.set_listing(ListingKind::Gym, a);
        c.set_listing(ListingKind::Hotel, b);
        assert_eq!(c.gym_id, None);
        assert_eq!(c.listing_ref(), Some((ListingKind::Hotel, b)));
    }

    #[test]
    fn json_only_carries_the_set_fk() {
        let mut c = blank();
        c.set_listing(ListingKind::Restaurant, Uuid::new_v4());
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("restaurant_id").is_some());
        assert!(json.get("hotel_id").is_none());
        assert_eq!(json["isAnonymous"], true);
        assert!(json["user_id"].is_null());
    }
}
