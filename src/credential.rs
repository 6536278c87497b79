//! Upstream API key handling.
//!
//! The key is resolved on every request through a [`CredentialSource`] and
//! then passed explicitly to the image client; nothing else reads it.

use std::fmt;
use std::sync::Arc;

/// Upstream API key. Never printed: `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    /// Returns `None` for blank values so an empty variable counts as unset.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        (!trimmed.is_empty()).then(|| Self(Arc::from(trimmed)))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<ApiKey>;
}

/// Reads the key from a named environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredential {
    fn api_key(&self) -> Option<ApiKey> {
        std::env::var(&self.var).ok().and_then(ApiKey::new)
    }
}

/// Fixed key, or no key at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<ApiKey>);

impl StaticCredential {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(ApiKey::new(raw))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn api_key(&self) -> Option<ApiKey> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_absent() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert!(StaticCredential::new("\t").api_key().is_none());
    }

    #[test]
    fn key_is_redacted_in_formatting() {
        let key = ApiKey::new("AIza-secret").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(<redacted>)");
        assert_eq!(key.to_string(), "<redacted>");
        assert_eq!(key.expose(), "AIza-secret");
    }

    #[test]
    fn unset_env_var_yields_no_key() {
        let source = EnvCredential::new("LUMEN_TEST_VARIABLE_THAT_IS_NEVER_SET");
        assert!(source.api_key().is_none());
    }
}
