//! Secure credential handling using the secrecy crate
//!
//! Secrets are wrapped in [`secrecy::Secret`], which zeroes memory on drop
//! and redacts `Debug` output. Reading the value requires an explicit
//! `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use vigil::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let api_key = secret_string("my-key".to_string());
//! assert!(api_key.expose_secret().verify("my-key"));
//!
//! // Debug output is redacted
//! assert!(!format!("{api_key:?}").contains("my-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret};
use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compare against a presented credential in time independent of where
    /// the first mismatch occurs
    pub fn verify(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = candidate.as_bytes();
        if expected.len() != candidate.len() {
            return false;
        }
        expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Helper function to create a SecretString from a String
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("test-key".to_string());
        assert_eq!(secret.expose_secret(), "test-key");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_verify() {
        let secret = secret_string("123456".to_string());
        assert!(secret.expose_secret().verify("123456"));
        assert!(!secret.expose_secret().verify("123457"));
        assert!(!secret.expose_secret().verify("1234567"));
        assert!(!secret.expose_secret().verify(""));
    }

    #[test]
    fn test_secret_deserialize() {
        #[derive(Deserialize)]
        struct TestConfig {
            api_key: SecretString,
        }

        let config: TestConfig = toml::from_str("api_key = \"abc\"").unwrap();
        assert_eq!(config.api_key.expose_secret(), "abc");
        assert!(!config.api_key.expose_secret().is_empty());
    }
}
