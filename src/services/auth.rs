//! Authentication service implementation
//!
//! Login for both account kinds, bearer-token resolution into an [`Actor`],
//! and admin account creation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::database::{AdminRepository, AlumniRepository};
use crate::models::{Actor, Admin, CreateAdminRequest};
use crate::utils::errors::{AluMapError, Result};
use crate::utils::security::{
    create_access_token, decode_access_token, hash_password, verify_password,
};

/// Bearer token issued on successful authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    alumni: AlumniRepository,
    admins: AdminRepository,
    token_secret: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(alumni: AlumniRepository, admins: AdminRepository, token_secret: String) -> Self {
        Self {
            alumni,
            admins,
            token_secret,
        }
    }

    /// Authenticate an account and return a bearer token.
    ///
    /// Alumni accounts are checked first, then admins. Unverified or banned
    /// alumni are rejected even with a correct password.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        debug!("Login attempt");

        if let Some(alumni) = self.alumni.find_by_email(email).await? {
            if !verify_password(password, &alumni.hashed_password) {
                return Err(bad_credentials());
            }
            if !alumni.is_verified {
                return Err(AluMapError::Unauthenticated(
                    "Account not verified".to_string(),
                ));
            }
            if alumni.is_banned {
                return Err(AluMapError::Unauthenticated("Account is banned".to_string()));
            }

            let token =
                create_access_token(&self.token_secret, &alumni.email, alumni.id, "alumni")?;
            info!(alumni_id = %alumni.id, "Alumni logged in");
            return Ok(TokenResponse::bearer(token));
        }

        if let Some(admin) = self.admins.find_by_email(email).await? {
            if !verify_password(password, &admin.hashed_password) {
                return Err(bad_credentials());
            }

            let token = create_access_token(&self.token_secret, &admin.email, admin.id, "admin")?;
            info!(admin_id = %admin.id, "Admin logged in");
            return Ok(TokenResponse::bearer(token));
        }

        warn!("Login attempt for unknown account");
        Err(bad_credentials())
    }

    /// Resolve a bearer token into the acting account
    pub async fn authenticate(&self, token: &str) -> Result<Actor> {
        let claims = decode_access_token(&self.token_secret, token)?;

        match claims.user_type.as_str() {
            "alumni" => {
                let alumni = self
                    .alumni
                    .find_by_id(claims.user_id)
                    .await?
                    .ok_or_else(|| AluMapError::Unauthenticated("Account no longer exists".to_string()))?;
                if alumni.is_banned {
                    return Err(AluMapError::Unauthenticated("Account is banned".to_string()));
                }
                Ok(Actor::Alumni(alumni))
            }
            "admin" => {
                let admin = self
                    .admins
                    .find_by_id(claims.user_id)
                    .await?
                    .ok_or_else(|| AluMapError::Unauthenticated("Account no longer exists".to_string()))?;
                Ok(Actor::Admin(admin))
            }
            other => Err(AluMapError::Unauthenticated(format!(
                "Unknown account type: {}",
                other
            ))),
        }
    }

    /// Create a new admin account. Only existing admins may do this.
    pub async fn add_admin(&self, actor: &Actor, request: CreateAdminRequest) -> Result<Admin> {
        match actor {
            Actor::Admin(_) => {}
            Actor::Alumni(_) => {
                return Err(AluMapError::Forbidden(
                    "Only admins can add new admin users".to_string(),
                ))
            }
        }

        if self.admins.find_by_email(&request.email).await?.is_some() {
            return Err(AluMapError::Conflict(
                "An admin with this email already exists".to_string(),
            ));
        }

        let hashed = hash_password(&request.password)?;
        let admin = self.admins.create(&request.email, &hashed).await?;
        info!(admin_id = %admin.id, created_by = %actor.id(), "Admin account created");
        Ok(admin)
    }
}

fn bad_credentials() -> AluMapError {
    AluMapError::Unauthenticated("Incorrect email or password".to_string())
}
