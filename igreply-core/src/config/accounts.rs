//! Static account registry.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A platform-assigned Instagram professional account id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "CompactString", into = "CompactString")]
pub struct AccountId(CompactString);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid account id {0:?}: expected a non-empty string of ASCII digits")]
pub struct InvalidAccountId(pub String);

impl AccountId {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, InvalidAccountId> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidAccountId(raw.to_owned()));
        }
        Ok(Self(CompactString::from(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<CompactString> for AccountId {
    type Error = InvalidAccountId;

    fn try_from(value: CompactString) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountId> for CompactString {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl Borrow<str> for AccountId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of accounts this service is allowed to send on behalf of.
///
/// Built once at start-up and never mutated. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    accounts: Arc<HashSet<AccountId>>,
}

impl AccountRegistry {
    pub fn new(accounts: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            accounts: Arc::new(accounts.into_iter().collect()),
        }
    }

    pub fn contains(&self, account_id: &str) -> bool {
        self.accounts.contains(account_id)
    }

    pub fn get(&self, account_id: &str) -> Option<&AccountId> {
        self.accounts.get(account_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountId> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl FromIterator<AccountId> for AccountRegistry {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_accepts_digits() {
        let id = AccountId::parse(" 17841401533576017 ").unwrap();
        assert_eq!(id.as_str(), "17841401533576017");
    }

    #[test]
    fn test_account_id_rejects_garbage() {
        assert!(AccountId::parse("").is_err());
        assert!(AccountId::parse("abc").is_err());
        assert!(AccountId::parse("123/../456").is_err());
    }

    #[test]
    fn test_registry_lookup_by_str() {
        let registry: AccountRegistry = [AccountId::parse("1").unwrap(), AccountId::parse("2").unwrap()]
            .into_iter()
            .collect();
        assert!(registry.contains("1"));
        assert!(!registry.contains("3"));
        assert_eq!(registry.get("2").map(AccountId::as_str), Some("2"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_account_id_deserialize_validates() {
        let ok: AccountId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(ok.as_str(), "42");
        assert!(serde_json::from_str::<AccountId>(r#""4x2""#).is_err());
    }
}
