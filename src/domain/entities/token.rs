//! Bearer token types.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Purpose a token was minted for. A token only validates for its own scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    Activation,
    Authentication,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Activation => "activation",
            TokenScope::Authentication => "authentication",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activation" => Ok(TokenScope::Activation),
            "authentication" => Ok(TokenScope::Authentication),
            other => Err(format!("unknown token scope '{other}'")),
        }
    }
}

/// Persisted form of a token. Holds only the digest of the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub hash: Vec<u8>,
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

impl TokenRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

/// A freshly minted token, the only place its plaintext ever exists.
///
/// Not `Clone` and not `Serialize`; `Debug` redacts the secret. The plaintext
/// leaves through [`IssuedToken::into_plaintext`], which consumes the value.
pub struct IssuedToken {
    plaintext: String,
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

impl IssuedToken {
    pub(crate) fn new(
        plaintext: String,
        user_id: i64,
        expiry: DateTime<Utc>,
        scope: TokenScope,
    ) -> Self {
        Self {
            plaintext,
            user_id,
            expiry,
            scope,
        }
    }

    pub fn into_plaintext(self) -> String {
        self.plaintext
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("plaintext", &"[redacted]")
            .field("user_id", &self.user_id)
            .field("expiry", &self.expiry)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_scope_round_trips_through_str() {
        for scope in [TokenScope::Activation, TokenScope::Authentication] {
            assert_eq!(scope.as_str().parse::<TokenScope>().unwrap(), scope);
        }
        assert!("admin".parse::<TokenScope>().is_err());
    }

    #[test]
    fn test_debug_redacts_plaintext() {
        let token = IssuedToken::new(
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
            1,
            Utc::now(),
            TokenScope::Authentication,
        );
        let debug = format!("{token:?}");
        assert!(!debug.contains("ABCDEFGHIJKLMNOPQRSTUVWXYZ"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let record = TokenRecord {
            hash: vec![0; 32],
            user_id: 1,
            expiry: now,
            scope: TokenScope::Activation,
        };
        assert!(record.is_expired_at(now));
        assert!(!record.is_expired_at(now - Duration::seconds(1)));
    }
}
