use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::routes::auth::SessionResponse;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub codArea: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub isAdmin: Option<bool>,
    pub isActive: Option<bool>,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub codArea: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub isAdmin: Option<bool>,
    pub isActive: Option<bool>,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct UserDoc {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub codArea: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub isAdmin: bool,
    pub isActive: bool,
}

/// Multipart body of listing create/update. `location`, `offers`, `time`
/// and `categories` are JSON strings; `images` repeats once per file.
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct ListingFormDoc {
    pub name: String,
    /// `{"latitude": .., "longitude": ..}`
    pub location: String,
    /// JSON array of strings
    pub offers: String,
    pub codArea: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub web: Option<String>,
    /// `{"weekdays": "..", "weekends": ".."}`
    pub time: String,
    pub zone: Option<String>,
    /// JSON array of strings (not accepted for movieTheaters)
    pub categories: Option<String>,
    pub user_id: Uuid,
    /// One entry per image file
    pub images: Vec<String>,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct ListingDoc {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = Object)]
    pub location: serde_json::Value,
    pub images: Vec<String>,
    pub offers: Vec<String>,
    pub codArea: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub web: String,
    #[schema(value_type = Object)]
    pub time: serde_json::Value,
    pub zone: String,
    pub categories: Option<Vec<String>>,
    pub isActive: bool,
    pub user_id: Uuid,
    /// Mean comment rating; null without comments
    pub averageStars: Option<f64>,
}

/// The listing array is keyed by the route segment, e.g. `restaurants`.
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct ListingPageDoc {
    pub currentPage: Option<u32>,
    pub totalResults: u64,
    pub items: Vec<ListingDoc>,
}

/// Exactly one `<kind>_id` is set.
#[derive(ToSchema)]
pub struct CreateCommentRequest {
    pub comments: String,
    pub stars: f64,
    pub user_id: Option<Uuid>,
    pub restaurant_id: Option<Uuid>,
    pub hotel_id: Option<Uuid>,
    pub taxi_id: Option<Uuid>,
    pub gym_id: Option<Uuid>,
    pub supermarket_id: Option<Uuid>,
    pub tourism_id: Option<Uuid>,
    pub movie_theater_id: Option<Uuid>,
    pub emergency_id: Option<Uuid>,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct CommentDoc {
    pub id: Uuid,
    pub comments: String,
    pub stars: f64,
    pub user_id: Option<Uuid>,
    pub isAnonymous: bool,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct CommentViewDoc {
    pub id: Uuid,
    pub comments: String,
    pub stars: f64,
    pub isAnonymous: bool,
    /// Author first name, or "Anónimo"
    pub userName: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::google,
        crate::routes::users::list,
        crate::routes::users::get_one,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::toggle_active,
        crate::routes::listings::list,
        crate::routes::listings::list_by_category,
        crate::routes::listings::list_by_owner,
        crate::routes::listings::create,
        crate::routes::listings::update,
        crate::routes::listings::toggle_active,
        crate::routes::listings::remove,
        crate::routes::comments::list,
        crate::routes::comments::list_for_listing,
        crate::routes::comments::create,
        crate::routes::comments::remove,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            RegisterRequest,
            UpdateUserRequest,
            UserDoc,
            SessionResponse,
            ListingFormDoc,
            ListingDoc,
            ListingPageDoc,
            CreateCommentRequest,
            CommentDoc,
            CommentViewDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "listings"),
        (name = "comments")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_generic_listing_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/{kind}/categories"));
        assert!(paths.iter().any(|p| p.as_str() == "/comments/{kind}/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/google"));
    }
}
