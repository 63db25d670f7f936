//! Allow-list gate
//!
//! Membership checks and bulk import over keyed hashes of confirmed-graduate
//! emails. Plaintext addresses never touch the database.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, info, warn};

use crate::database::AllowedEmailRepository;
use crate::utils::errors::Result;
use crate::utils::helpers::normalize_email;

type HmacSha256 = Hmac<Sha256>;

/// Summary of a bulk allow-list import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub added: usize,
}

#[derive(Debug, Clone)]
pub struct AllowListService {
    repository: AllowedEmailRepository,
    hash_secret: Option<String>,
}

impl AllowListService {
    /// Create a new AllowListService instance
    pub fn new(repository: AllowedEmailRepository, hash_secret: Option<String>) -> Self {
        if hash_secret.is_none() {
            warn!("Allow-list hash secret is not configured, all emails will be treated as not allowed");
        }
        Self {
            repository,
            hash_secret,
        }
    }

    /// Hash a normalized email with the configured key. None when no secret
    /// is configured.
    pub fn hash_email(&self, email: &str) -> Option<String> {
        self.hash_secret
            .as_deref()
            .map(|secret| hash_email_with_secret(secret, email))
    }

    /// Check whether an email belongs to a confirmed graduate
    pub async fn is_allowed(&self, email: &str) -> Result<bool> {
        let Some(hashed) = self.hash_email(email) else {
            warn!("Allow-list check without configured secret, treating email as not allowed");
            return Ok(false);
        };

        debug!("Checking allow-list membership");
        let allowed = self.repository.exists(&hashed).await?;
        info!(allowed = allowed, "Allow-list membership checked");
        Ok(allowed)
    }

    /// Import a batch of plaintext emails, hashing each and skipping entries
    /// already present. Parsing the upload (Excel or otherwise) happens
    /// outside this crate.
    pub async fn import_emails(&self, emails: &[String]) -> Result<ImportSummary> {
        let mut added = 0usize;
        let mut total = 0usize;

        for email in emails {
            let email = email.trim();
            if email.is_empty() {
                continue;
            }
            total += 1;

            let Some(hashed) = self.hash_email(email) else {
                warn!("Skipping allow-list import, no hash secret configured");
                break;
            };

            if self.repository.insert_if_absent(&hashed).await? {
                added += 1;
            }
        }

        let entries = self.repository.count().await?;
        info!(total = total, added = added, entries = entries, "Allow-list import completed");
        Ok(ImportSummary { total, added })
    }
}

/// Keyed hash of a normalized (lowercased, trimmed) email: hex HMAC-SHA256
pub fn hash_email_with_secret(secret: &str, email: &str) -> String {
    let normalized = normalize_email(email);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(normalized.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic_and_normalized() {
        let a = hash_email_with_secret("key", "Grad@Inst.EDU ");
        let b = hash_email_with_secret("key", "grad@inst.edu");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_depends_on_secret() {
        let a = hash_email_with_secret("key-one", "grad@inst.edu");
        let b = hash_email_with_secret("key-two", "grad@inst.edu");
        assert_ne!(a, b);
    }
}
