//! Listing domain types shared by every kind of business.
//!
//! The eight kinds live in eight tables of identical shape, so there is no
//! SeaORM entity per kind. Queries address the table through
//! [`ListingKind::table_name`] and read rows back as [`ListingRow`].
use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::{DeriveIden, FromJsonQueryResult, FromQueryResult};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Default for `web` when a listing is created without one.
pub const NO_WEB_ADDRESS: &str = "No hay dirección web";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingKind {
    Restaurant,
    Hotel,
    Taxi,
    Gym,
    Supermarket,
    Tourism,
    MovieTheater,
    Emergency,
}

const RESTAURANT_CATEGORIES: &[&str] = &[
    "Churrasqueria", "Polleria", "Mariscos", "Cochabambina", "Rapida", "Alitas", "Oriental",
    "Salteñerias", "Mexicana", "Americana", "Cafes", "Vegetariana", "Pizzeria", "Heladeria",
    "Pasteleria", "Internacional", "Otros",
];
const HOTEL_CATEGORIES: &[&str] = &[
    "Hoteles", "Hostales", "Residenciales", "Alojamientos", "Moteles", "Apart Hotel", "Otros",
];
const TAXI_CATEGORIES: &[&str] = &["Radio Taxi", "Taxi Ejecutivo", "Mototaxi", "Trufi", "Otros"];
const GYM_CATEGORIES: &[&str] = &[
    "Gimnacios", "Calistenia", "Boxeo", "Karate", "Natacion", "MMA", "Futbol", "Otros",
];
const SUPERMARKET_CATEGORIES: &[&str] = &[
    "Supermercados", "Minimercados", "Mayoristas", "Tiendas de Barrio", "Otros",
];
const TOURISM_CATEGORIES: &[&str] = &["Museos", "Parques", "Aventura", "Discotecas"];
const EMERGENCY_CATEGORIES: &[&str] = &[
    "Bomberos", "Policia", "Hospitales", "SAR Bolivia", "Defensa Civil", "Cruz Roja",
    "Compañia de Servicios", "Ambulancias", "Farmacias",
];

impl ListingKind {
    pub const ALL: [ListingKind; 8] = [
        ListingKind::Restaurant,
        ListingKind::Hotel,
        ListingKind::Taxi,
        ListingKind::Gym,
        ListingKind::Supermarket,
        ListingKind::Tourism,
        ListingKind::MovieTheater,
        ListingKind::Emergency,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            ListingKind::Restaurant => "restaurants",
            ListingKind::Hotel => "hotels",
            ListingKind::Taxi => "taxis",
            ListingKind::Gym => "gyms",
            ListingKind::Supermarket => "supermarkets",
            ListingKind::Tourism => "tourisms",
            ListingKind::MovieTheater => "movie_theaters",
            ListingKind::Emergency => "emergencies",
        }
    }

    /// Column on `comments` that references this kind.
    pub fn foreign_key(self) -> &'static str {
        match self {
            ListingKind::Restaurant => "restaurant_id",
            ListingKind::Hotel => "hotel_id",
            ListingKind::Taxi => "taxi_id",
            ListingKind::Gym => "gym_id",
            ListingKind::Supermarket => "supermarket_id",
            ListingKind::Tourism => "tourism_id",
            ListingKind::MovieTheater => "movie_theater_id",
            ListingKind::Emergency => "emergency_id",
        }
    }

    /// Path segment of the listing routes, also the key of the result array.
    pub fn route_segment(self) -> &'static str {
        match self {
            ListingKind::Restaurant => "restaurants",
            ListingKind::Hotel => "hotels",
            ListingKind::Taxi => "taxis",
            ListingKind::Gym => "gyms",
            ListingKind::Supermarket => "supermarkets",
            ListingKind::Tourism => "tourisms",
            ListingKind::MovieTheater => "movieTheaters",
            ListingKind::Emergency => "emergencies",
        }
    }

    /// Path segment under `/comments/`.
    pub fn comment_segment(self) -> &'static str {
        match self {
            ListingKind::Restaurant => "restaurant",
            ListingKind::Hotel => "hotel",
            ListingKind::Taxi => "taxi",
            ListingKind::Gym => "gym",
            ListingKind::Supermarket => "supermarket",
            ListingKind::Tourism => "tourism",
            ListingKind::MovieTheater => "movieTheater",
            ListingKind::Emergency => "emergency",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingKind::Restaurant => "Restaurant",
            ListingKind::Hotel => "Hotel",
            ListingKind::Taxi => "Taxi",
            ListingKind::Gym => "Gym",
            ListingKind::Supermarket => "Supermarket",
            ListingKind::Tourism => "Tourism spot",
            ListingKind::MovieTheater => "Movie theater",
            ListingKind::Emergency => "Emergency service",
        }
    }

    /// Allowed category values, or `None` for kinds that carry no categories.
    pub fn categories(self) -> Option<&'static [&'static str]> {
        match self {
            ListingKind::Restaurant => Some(RESTAURANT_CATEGORIES),
            ListingKind::Hotel => Some(HOTEL_CATEGORIES),
            ListingKind::Taxi => Some(TAXI_CATEGORIES),
            ListingKind::Gym => Some(GYM_CATEGORIES),
            ListingKind::Supermarket => Some(SUPERMARKET_CATEGORIES),
            ListingKind::Tourism => Some(TOURISM_CATEGORIES),
            ListingKind::MovieTheater => None,
            ListingKind::Emergency => Some(EMERGENCY_CATEGORIES),
        }
    }

    pub fn has_categories(self) -> bool {
        self.categories().is_some()
    }

    /// Media host folder for this kind's images, e.g. `restaurants_images`.
    pub fn upload_folder(self) -> String {
        format!("{}_images", self.route_segment())
    }

    pub fn from_route_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.route_segment() == segment)
    }

    pub fn from_comment_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.comment_segment() == segment)
    }

    /// Reject any category outside this kind's enumeration.
    pub fn validate_categories(self, values: &[String]) -> Result<(), ModelError> {
        let allowed = self.categories().ok_or_else(|| {
            ModelError::Validation(format!("{} listings have no categories", self.label()))
        })?;
        match values.iter().find(|v| !allowed.contains(&v.as_str())) {
            Some(bad) => Err(ModelError::Validation(format!("invalid category: {bad}"))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_segment())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Zone {
    Este,
    Norte,
    Sur,
    Oeste,
    #[default]
    Central,
}

impl Zone {
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Este => "Este",
            Zone::Norte => "Norte",
            Zone::Sur => "Sur",
            Zone::Oeste => "Oeste",
            Zone::Central => "Central",
        }
    }
}

impl FromStr for Zone {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Este" => Ok(Zone::Este),
            "Norte" => Ok(Zone::Norte),
            "Sur" => Ok(Zone::Sur),
            "Oeste" => Ok(Zone::Oeste),
            "Central" => Ok(Zone::Central),
            other => Err(ModelError::Validation(format!("invalid zone: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Opening hours as free text, e.g. `"08:00-22:00"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Schedule {
    pub weekdays: String,
    pub weekends: String,
}

/// Column names shared by every listing table.
#[derive(DeriveIden, Clone, Copy, Debug)]
pub enum ListingIden {
    Id,
    Name,
    Location,
    Images,
    Offers,
    CodArea,
    Phone,
    City,
    Country,
    Web,
    Time,
    Zone,
    Categories,
    IsActive,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub name: String,
    pub location: Location,
    pub images: Vec<String>,
    pub offers: Vec<String>,
    pub cod_area: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub web: Option<String>,
    pub time: Schedule,
    pub zone: Zone,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub categories: Option<Vec<String>>,
    pub is_active: bool,
    #[serde(rename = "user_id")]
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Raw row of any listing table.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ListingRow {
    pub id: Uuid,
    pub name: String,
    pub location: Location,
    pub images: Vec<String>,
    pub offers: Vec<String>,
    pub cod_area: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub web: Option<String>,
    pub time: Schedule,
    pub zone: String,
    pub categories: Vec<String>,
    pub is_active: bool,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl ListingRow {
    pub fn into_listing(self, kind: ListingKind) -> Result<Listing, ModelError> {
        let zone = self.zone.parse()?;
        Ok(Listing {
            id: self.id,
            name: self.name,
            location: self.location,
            images: self.images,
            offers: self.offers,
            cod_area: self.cod_area,
            phone: self.phone,
            city: self.city,
            country: self.country,
            web: self.web,
            time: self.time,
            zone,
            categories: kind.has_categories().then_some(self.categories),
            is_active: self.is_active,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
