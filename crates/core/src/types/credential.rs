//! Stored credential types.

use serde::{Deserialize, Serialize};

/// A stored password hash in PHC string format.
///
/// This wraps the serialized Argon2id hash produced at registration for
/// type-safe storage in the auth registry. The wrapper exists so a hash can
/// never be handed out where a plain string (or a [`crate::Email`]) is
/// expected, and so sessions cannot accidentally carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Create a new stored hash from a PHC string.
    #[must_use]
    pub const fn new(phc: String) -> Self {
        Self(phc)
    }

    /// Get the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner PHC string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for PasswordHash {
    fn from(phc: String) -> Self {
        Self(phc)
    }
}

impl From<PasswordHash> for String {
    fn from(hash: PasswordHash) -> Self {
        hash.0
    }
}
