//! Signed, expiring tokens embedded in every HTML form.
//!
//! A token reads `{issued_at}.{signature}` where `issued_at` is a unix timestamp
//! and `signature = hex(sha256(secret ":" issued_at))`. Tokens are stateless, so
//! any instance sharing the secret can verify them.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Matches the default lifetime of the form tokens the site has always issued.
pub const TOKEN_TTL: Duration = Duration::hours(1);

/// Name of the hidden input carrying the token.
pub const FORM_TOKEN_FIELD: &str = "csrf_token";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormTokenError {
    #[error("form token missing")]
    Missing,
    #[error("form token malformed")]
    Malformed,
    #[error("form token signature mismatch")]
    BadSignature,
    #[error("form token expired")]
    Expired,
}

#[derive(Clone)]
pub struct FormTokenSigner {
    secret: Vec<u8>,
}

impl FormTokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    pub fn issue(&self) -> String {
        self.issue_at(OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, now: OffsetDateTime) -> String {
        let issued_at = now.unix_timestamp();
        format!("{issued_at}.{}", self.sign(issued_at))
    }

    pub fn verify(&self, token: Option<&str>) -> Result<(), FormTokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    pub fn verify_at(
        &self,
        token: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<(), FormTokenError> {
        let token = token
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(FormTokenError::Missing)?;

        let (issued_raw, signature) = token.split_once('.').ok_or(FormTokenError::Malformed)?;
        let issued_at: i64 = issued_raw.parse().map_err(|_| FormTokenError::Malformed)?;

        let expected = self.sign(issued_at);
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(FormTokenError::BadSignature);
        }

        let age = now.unix_timestamp() - issued_at;
        if age < 0 {
            return Err(FormTokenError::Malformed);
        }
        if age > TOKEN_TTL.whole_seconds() {
            return Err(FormTokenError::Expired);
        }

        Ok(())
    }

    fn sign(&self, issued_at: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(b":");
        hasher.update(issued_at.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Debug for FormTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormTokenSigner")
            .field("ttl", &TOKEN_TTL)
            .finish_non_exhaustive()
    }
}
