//! Service layer providing business operations on top of models.
//! - Separates business logic from data access (repository traits with
//!   SeaORM and in-memory implementations).
//! - One listing engine parameterized by `ListingKind`.
//! - Media hosts and identity providers sit behind traits.

pub mod errors;
pub mod pagination;
pub mod runtime;
pub mod media;
pub mod listing;
pub mod comment;
pub mod auth;
pub mod user_service;
pub mod memory;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use pagination::Pagination;
