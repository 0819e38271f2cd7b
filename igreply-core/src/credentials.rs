//! Per-account bearer credential lookup.
//!
//! Each registered account `<id>` reads its Graph API token from the
//! environment variable `token_<id>`. Lookups happen on every call so a
//! rotated token takes effect without a restart.

use std::env::VarError;
use std::fmt;

use crate::config::AccountId;
use crate::env::ReadEnv;

/// Prefix of the environment variable holding an account's token.
pub const CREDENTIAL_ENV_PREFIX: &str = "token_";

/// Environment variable name for `account_id`'s credential.
pub fn credential_key(account_id: &str) -> String {
    format!("{CREDENTIAL_ENV_PREFIX}{account_id}")
}

/// A Graph API access token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential not found: {key} is not set")]
    NotFound { key: String },

    #[error("credential {key} is not valid unicode")]
    NotUnicode { key: String },
}

/// Resolves account credentials from an injected environment.
#[derive(Debug, Clone)]
pub struct CredentialResolver<E> {
    env: E,
}

impl<E: ReadEnv> CredentialResolver<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    pub fn resolve(&self, account_id: &AccountId) -> Result<BearerToken, CredentialError> {
        let key = credential_key(account_id.as_str());
        match self.env.var(&key) {
            Ok(value) if !value.trim().is_empty() => Ok(BearerToken(value.trim().to_owned())),
            Ok(_) | Err(VarError::NotPresent) => Err(CredentialError::NotFound { key }),
            Err(VarError::NotUnicode(_)) => Err(CredentialError::NotUnicode { key }),
        }
    }
}
