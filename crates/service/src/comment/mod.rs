//! Comments and star ratings on listings.

pub mod repo;
pub mod repository;
pub mod service;

pub use repository::CommentRepository;
pub use service::{display_name, CommentService, CommentView, CreateCommentInput, ANONYMOUS_NAME};
