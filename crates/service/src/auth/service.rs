use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::user;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::google::IdentityVerifier;
use super::password::{hash_password, validate_password, verify_password};
use super::repository::UserRepository;

/// Token signing settings
#[derive(Clone)]
pub struct TokenConfig {
    pub jwt_secret: String,
    pub ttl_secs: u64,
}

impl TokenConfig {
    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), ttl_secs: cfg.token_ttl_secs }
    }
}

/// Auth business service independent of web framework
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    verifier: Arc<dyn IdentityVerifier>,
    cfg: TokenConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, verifier: Arc<dyn IdentityVerifier>, cfg: TokenConfig) -> Self {
        Self { users, verifier, cfg }
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, StaticIdentityVerifier, TokenConfig};
    /// use service::auth::domain::RegisterInput;
    /// use service::memory::MemoryStore;
    /// let svc = AuthService::new(
    ///     Arc::new(MemoryStore::default()),
    ///     Arc::new(StaticIdentityVerifier::default()),
    ///     TokenConfig { jwt_secret: "0123456789abcdef".into(), ttl_secs: 60 },
    /// );
    /// let input = RegisterInput { name: "Ana".into(), email: "ana@example.com".into(), password: "Secret123".into(), ..Default::default() };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "ana@example.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        user::validate_name(&input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        user::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        validate_password(&input.password)?;
        let email = input.email.trim().to_string();
        if let Some(existing) = self.users.find_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let now = Utc::now().into();
        let created = self
            .users
            .insert(user::Model {
                id: Uuid::new_v4(),
                name: input.name.trim().to_string(),
                email,
                password: Some(hash_password(&input.password)?),
                cod_area: input.cod_area,
                phone: input.phone,
                city: input.city,
                country: input.country,
                is_admin: input.is_admin.unwrap_or(false),
                is_active: input.is_active.unwrap_or(true),
                created_at: now,
                updated_at: now,
            })
            .await?;
        let token = self.issue_token(&created)?;
        info!(user_id = %created.id, email = %created.email, "user_registered");
        Ok(AuthSession { user: created, token })
    }

    /// Authenticate by email and password. Unknown email, wrong password and
    /// password-less accounts all fail the same way.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .find_by_email(input.email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let phc = user.password.as_deref().ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(&input.password, phc)? {
            return Err(AuthError::InvalidCredentials);
        }
        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Verify a Google ID token and upsert the user by email. The flag is
    /// true when the account was created by this call.
    #[instrument(skip(self, id_token))]
    pub async fn login_with_google(&self, id_token: &str) -> Result<(AuthSession, bool), AuthError> {
        if id_token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }
        let identity = self.verifier.verify(id_token.trim()).await?;
        if let Some(user) = self.users.find_by_email(&identity.email).await? {
            let token = self.issue_token(&user)?;
            info!(user_id = %user.id, "google_login");
            return Ok((AuthSession { user, token }, false));
        }

        let name = identity
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| identity.email.split('@').next().unwrap_or_default().to_string());
        let now = Utc::now().into();
        let created = self
            .users
            .insert(user::Model {
                id: Uuid::new_v4(),
                name,
                email: identity.email,
                password: None,
                cod_area: None,
                phone: None,
                city: None,
                country: None,
                is_admin: false,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
        let token = self.issue_token(&created)?;
        info!(user_id = %created.id, "google_user_created");
        Ok((AuthSession { user: created, token }, true))
    }

    pub fn issue_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp().max(0) as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat,
            exp: iat + self.cfg.ttl_secs as usize,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Decode and check signature and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::InvalidToken
            })
    }
}
