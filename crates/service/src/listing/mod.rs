//! Listing engine: one implementation serving all eight listing kinds.
//!
//! - `repository`: persistence abstraction (SeaORM or in-memory).
//! - `form`: multipart field parsing and the fill-if-missing merge.
//! - `service`: search, rating annotation and mutations.

pub mod form;
pub mod repo;
pub mod repository;
pub mod service;

pub use form::ListingForm;
pub use repository::{ListingFilter, ListingRepository};
pub use service::{ListingPage, ListingService, RatedListing};
