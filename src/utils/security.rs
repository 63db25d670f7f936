//! Security primitives
//!
//! Password hashing (PBKDF2-HMAC-SHA256), bearer token generation and
//! verification, and verification-code generation. These are treated as
//! opaque building blocks by the workflow services.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::Hmac;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::utils::errors::{AluMapError, Result};

type HmacSha256 = Hmac<Sha256>;

const PBKDF2_ITERATIONS: u32 = 260_000;
const PBKDF2_KEY_LENGTH: usize = 32;
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub sub: String,
    pub user_id: Uuid,
    /// "alumni" or "admin"
    pub user_type: String,
    pub exp: i64,
}

/// Hash a password with PBKDF2-HMAC-SHA256 and a random 16-byte salt.
///
/// Format: `pbkdf2:sha256:iterations$salt$hash` with URL-safe base64 and no
/// padding.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; PBKDF2_KEY_LENGTH];
    pbkdf2::pbkdf2::<HmacSha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key)
        .map_err(|e| AluMapError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(format!(
        "pbkdf2:sha256:{}${}${}",
        PBKDF2_ITERATIONS,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(key)
    ))
}

/// Verify a password against a stored `pbkdf2:sha256:iterations$salt$hash`
/// string. Malformed hashes verify as false rather than erroring.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 3 {
        return false;
    }

    let iterations = match parts[0].rsplit(':').next().and_then(|s| s.parse::<u32>().ok()) {
        Some(n) if n > 0 => n,
        _ => return false,
    };

    let salt = match URL_SAFE_NO_PAD.decode(parts[1]) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let expected = match URL_SAFE_NO_PAD.decode(parts[2]) {
        Ok(h) => h,
        Err(_) => return false,
    };
    if expected.len() != PBKDF2_KEY_LENGTH {
        return false;
    }

    let mut key = [0u8; PBKDF2_KEY_LENGTH];
    if pbkdf2::pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut key).is_err() {
        return false;
    }

    key.as_slice() == expected.as_slice()
}

/// Generate a bearer token for an authenticated account
pub fn create_access_token(
    secret: &str,
    email: &str,
    user_id: Uuid,
    user_type: &str,
) -> Result<String> {
    let exp = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_LIFETIME_HOURS))
        .ok_or_else(|| AluMapError::Internal("Failed to compute token expiry".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: email.to_string(),
        user_id,
        user_type: user_type.to_string(),
        exp,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Decode and validate a bearer token
pub fn decode_access_token(secret: &str, token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AluMapError::Unauthenticated("Invalid or expired token".to_string()))?;

    Ok(data.claims)
}

/// Generate a 6-digit numeric verification code.
///
/// Codes are only compared within a single alumni's own record, so global
/// uniqueness is not required.
pub fn generate_verification_code() -> String {
    let mut rng = rand::thread_rng();
    (0..6).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("pbkdf2:sha256:"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("whatever", "not-a-hash"));
        assert!(!verify_password("whatever", "pbkdf2:sha256:1000$bad!base64$bad!base64"));
    }

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_access_token("secret", "a@inst.edu", user_id, "alumni").unwrap();
        let claims = decode_access_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "a@inst.edu");
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.user_type, "alumni");
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = create_access_token("secret", "a@inst.edu", Uuid::new_v4(), "admin").unwrap();
        assert!(decode_access_token("other-secret", &token).is_err());
    }

    proptest! {
        #[test]
        fn test_verification_code_is_six_ascii_digits(_seed in 0u32..64) {
            let code = generate_verification_code();
            prop_assert_eq!(code.len(), 6);
            prop_assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
