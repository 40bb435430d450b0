use models::user;
use serde::{Deserialize, Serialize};

/// Signup input (`POST /users`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub cod_area: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

/// Login input
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Partial user update; absent or empty fields keep the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub cod_area: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

/// Identity asserted by a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub email: String,
    pub name: Option<String>,
}

/// JWT payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// user id
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Login result (session)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: user::Model,
    pub token: String,
}
