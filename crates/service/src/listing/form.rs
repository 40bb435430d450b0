//! Listing fields as they arrive in a multipart request.
//!
//! Every field is a string. `location`, `offers`, `time` and `categories`
//! carry JSON text and are decoded here, so handlers never see raw JSON.
use chrono::{DateTime, FixedOffset};
use models::listing::NO_WEB_ADDRESS;
use models::{Listing, ListingKind, Location, Schedule, Zone};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingForm {
    pub name: Option<String>,
    pub location: Option<String>,
    pub offers: Option<String>,
    pub cod_area: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub web: Option<String>,
    pub time: Option<String>,
    pub zone: Option<String>,
    pub categories: Option<String>,
    pub user_id: Option<String>,
}

/// Empty and whitespace-only values count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_json<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, ServiceError> {
    serde_json::from_str(raw).map_err(|e| ServiceError::validation(format!("{field} is not valid JSON: {e}")))
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, ServiceError> {
    present(value).ok_or_else(|| ServiceError::validation(format!("{field} is required")))
}

fn parse_user_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::validation(format!("user_id is not a valid id: {raw}")))
}

fn parse_categories(kind: ListingKind, raw: &str) -> Result<Vec<String>, ServiceError> {
    let values: Vec<String> = parse_json("categories", raw)?;
    kind.validate_categories(&values)?;
    Ok(values)
}

impl ListingForm {
    /// Store a multipart text field by its wire name. Returns false for
    /// names that are not listing fields.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "location" => &mut self.location,
            "offers" => &mut self.offers,
            "codArea" => &mut self.cod_area,
            "phone" => &mut self.phone,
            "city" => &mut self.city,
            "country" => &mut self.country,
            "web" => &mut self.web,
            "time" => &mut self.time,
            "zone" => &mut self.zone,
            "categories" => &mut self.categories,
            "user_id" => &mut self.user_id,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Build a new active listing with no images yet.
    pub fn into_new_listing(self, kind: ListingKind, now: DateTime<FixedOffset>) -> Result<Listing, ServiceError> {
        let name = required("name", &self.name)?.to_string();
        let user_id = parse_user_id(required("user_id", &self.user_id)?)?;
        let location: Location = parse_json("location", required("location", &self.location)?)?;
        let offers: Vec<String> = parse_json("offers", required("offers", &self.offers)?)?;
        let time: Schedule = parse_json("time", required("time", &self.time)?)?;
        let zone = match present(&self.zone) {
            Some(z) => z.parse::<Zone>()?,
            None => Zone::default(),
        };
        let categories = match (kind.has_categories(), present(&self.categories)) {
            (true, Some(raw)) => Some(parse_categories(kind, raw)?),
            (true, None) => return Err(ServiceError::validation("categories is required")),
            (false, Some(_)) => {
                return Err(ServiceError::validation(format!("{} listings have no categories", kind.label())))
            }
            (false, None) => None,
        };

        Ok(Listing {
            id: Uuid::new_v4(),
            name,
            location,
            images: Vec::new(),
            offers,
            cod_area: present(&self.cod_area).map(str::to_string),
            phone: present(&self.phone).map(str::to_string),
            city: present(&self.city).map(str::to_string),
            country: present(&self.country).map(str::to_string),
            web: Some(present(&self.web).unwrap_or(NO_WEB_ADDRESS).to_string()),
            time,
            zone,
            categories,
            is_active: true,
            user_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fill-if-missing merge: every present field replaces the stored value,
    /// absent or empty fields keep it. Images and `isActive` are untouched.
    pub fn merge_into(self, kind: ListingKind, listing: &mut Listing) -> Result<(), ServiceError> {
        if let Some(name) = present(&self.name) {
            listing.name = name.to_string();
        }
        if let Some(raw) = present(&self.location) {
            listing.location = parse_json("location", raw)?;
        }
        if let Some(raw) = present(&self.offers) {
            listing.offers = parse_json("offers", raw)?;
        }
        if let Some(raw) = present(&self.time) {
            listing.time = parse_json("time", raw)?;
        }
        if let Some(raw) = present(&self.zone) {
            listing.zone = raw.parse()?;
        }
        if let Some(raw) = present(&self.categories) {
            if !kind.has_categories() {
                return Err(ServiceError::validation(format!("{} listings have no categories", kind.label())));
            }
            listing.categories = Some(parse_categories(kind, raw)?);
        }
        if let Some(raw) = present(&self.user_id) {
            listing.user_id = parse_user_id(raw)?;
        }
        let text_fields = [
            (present(&self.cod_area), &mut listing.cod_area),
            (present(&self.phone), &mut listing.phone),
            (present(&self.city), &mut listing.city),
            (present(&self.country), &mut listing.country),
            (present(&self.web), &mut listing.web),
        ];
        for (incoming, stored) in text_fields {
            if let Some(v) = incoming {
                *stored = Some(v.to_string());
            }
        }
        Ok(())
    }
}
