pub mod errors;
pub mod db;
pub mod user;
pub mod comment;
pub mod listing;

pub use listing::{Listing, ListingKind, ListingRow, Location, Schedule, Zone};
