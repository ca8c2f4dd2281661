//! Bearer token lifecycle: minting, validation and revocation.

use chrono::{Duration, Utc};
use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::domain::entities::{IssuedToken, TokenRecord, TokenScope};
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Random bytes drawn per token.
pub const TOKEN_ENTROPY_BYTES: usize = 16;
/// Length of the base32 plaintext for [`TOKEN_ENTROPY_BYTES`] of entropy.
pub const TOKEN_PLAINTEXT_LEN: usize = 26;

/// Rejects anything that cannot be a token this service minted.
///
/// Runs before any digest or lookup, so garbage input never reaches the store.
///
/// # Errors
///
/// Returns [`AppError::Validation`] with a `token` detail.
pub fn validate_plaintext_format(plaintext: &str) -> Result<(), AppError> {
    if plaintext.len() != TOKEN_PLAINTEXT_LEN {
        return Err(AppError::bad_request(
            "Failed validation",
            json!({ "token": format!("must be {TOKEN_PLAINTEXT_LEN} characters long") }),
        ));
    }
    if !plaintext
        .bytes()
        .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
    {
        return Err(AppError::bad_request(
            "Failed validation",
            json!({ "token": "must only contain the characters A-Z and 2-7" }),
        ));
    }
    Ok(())
}

/// Keyed digest of token plaintext.
///
/// Holds an HMAC-SHA256 instance already keyed with the server secret and
/// clones it per digest, so the key schedule runs once.
#[derive(Clone)]
pub struct TokenHasher {
    mac: HmacSha256,
}

impl TokenHasher {
    pub fn new(secret: &[u8]) -> Result<Self, hmac::digest::InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
        })
    }

    /// 32-byte digest of `plaintext`.
    pub fn digest(&self, plaintext: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(plaintext.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Service for scoped bearer tokens.
///
/// Only the keyed digest of a token is persisted. A database reader cannot
/// recover a usable token, nor forge one without the server secret.
pub struct TokenService<R: TokenRepository> {
    repository: Arc<R>,
    hasher: TokenHasher,
}

impl<R: TokenRepository> TokenService<R> {
    pub fn new(repository: Arc<R>, hasher: TokenHasher) -> Self {
        Self { repository, hasher }
    }

    /// Mints a token for `user_id` valid for `ttl` and stores its digest.
    ///
    /// # Errors
    ///
    /// - [`AppError::TokenGeneration`] if the OS random source fails
    /// - [`AppError::NotFound`] if the user does not exist
    /// - [`AppError::Unavailable`] if the store times out
    pub async fn issue(
        &self,
        user_id: i64,
        ttl: Duration,
        scope: TokenScope,
    ) -> Result<IssuedToken, AppError> {
        let mut entropy = [0u8; TOKEN_ENTROPY_BYTES];
        getrandom::fill(&mut entropy).map_err(|e| {
            tracing::error!(error = %e, "secure random source failed");
            AppError::token_generation(json!({ "reason": e.to_string() }))
        })?;

        let plaintext = BASE32_NOPAD.encode(&entropy);
        let record = TokenRecord {
            hash: self.hasher.digest(&plaintext),
            user_id,
            expiry: Utc::now() + ttl,
            scope,
        };

        self.repository.insert(&record).await?;

        metrics::counter!("tokens_issued_total", "scope" => scope.as_str()).increment(1);
        tracing::debug!(user_id, scope = %scope, expiry = %record.expiry, "token issued");

        Ok(IssuedToken::new(plaintext, user_id, record.expiry, scope))
    }

    /// Resolves `plaintext` to the owning user id.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the plaintext is malformed (no store call)
    /// - [`AppError::InvalidToken`] if it is unknown, expired, or of another scope
    pub async fn validate(&self, scope: TokenScope, plaintext: &str) -> Result<i64, AppError> {
        validate_plaintext_format(plaintext)?;

        let digest = self.hasher.digest(plaintext);
        let Some(record) = self.repository.find(&digest, scope).await? else {
            return Err(self.reject(scope, "unknown"));
        };

        if !bool::from(record.hash.as_slice().ct_eq(digest.as_slice())) {
            return Err(self.reject(scope, "digest_mismatch"));
        }
        if record.is_expired_at(Utc::now()) {
            return Err(self.reject(scope, "expired"));
        }

        Ok(record.user_id)
    }

    /// Deletes every token of `scope` held by `user_id`.
    pub async fn revoke_all(&self, scope: TokenScope, user_id: i64) -> Result<u64, AppError> {
        let removed = self.repository.delete_all_for_user(scope, user_id).await?;
        tracing::debug!(user_id, scope = %scope, removed, "tokens revoked");
        Ok(removed)
    }

    /// Deletes every expired token regardless of scope.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let removed = self.repository.delete_expired(Utc::now()).await?;
        tracing::info!(removed, "expired tokens purged");
        Ok(removed)
    }

    fn reject(&self, scope: TokenScope, reason: &'static str) -> AppError {
        metrics::counter!("tokens_rejected_total", "scope" => scope.as_str(), "reason" => reason)
            .increment(1);
        AppError::invalid_token()
    }
}
