//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Email/password signup and login, Google ID-token login, and the HS256
//! bearer tokens handed out by both.

pub mod domain;
pub mod errors;
pub mod google;
pub mod password;
pub mod repository;
pub mod service;
pub mod repo;

pub use google::{GoogleTokenInfoVerifier, IdentityVerifier, StaticIdentityVerifier};
pub use service::{AuthService, TokenConfig};
