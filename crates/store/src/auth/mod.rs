//! Authentication store.
//!
//! A local, client-only user directory plus single-session login state.
//! This is not a real identity system: no network, no recovery flows, and
//! the registry lives in the same local document store as everything else.
//! Passwords are hashed with Argon2id before they touch the backend.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farine_core::{Email, PasswordHash, UserId};

use crate::persist::{self, KeyValueStore, StorageError, keys};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Well-known demo account, seeded by [`AuthStore::seed_demo`].
pub const DEMO_EMAIL: &str = "demo@farine.com";
/// Demo account password.
pub const DEMO_PASSWORD: &str = "demo1234";
/// Demo account display name.
pub const DEMO_NAME: &str = "Demo User";

/// A registered user. Created by registration or demo seeding; never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique, generated user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized email, the natural key of the registry.
    pub email: Email,
    /// Argon2id hash of the password.
    pub password_hash: PasswordHash,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// The currently authenticated user: a [`UserRecord`] projection with the
/// password hash stripped. At most one session is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The user's id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized email.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for Session {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Persisted auth document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AuthState {
    user: Option<Session>,
    users: Vec<UserRecord>,
}

/// Local user directory and session state.
pub struct AuthStore {
    state: AuthState,
    kv: Arc<dyn KeyValueStore>,
}

impl AuthStore {
    /// Load auth state from the backend, starting empty if no document
    /// exists. The session survives restarts until an explicit logout.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend read fails or the stored
    /// document is corrupt.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let state = persist::load(kv.as_ref(), keys::FARINE_AUTH)?.unwrap_or_default();
        Ok(Self { state, kv })
    }

    /// Register a new account and immediately establish a session for it.
    ///
    /// The email is normalized (trimmed, lowercased) before the uniqueness
    /// check, so `A@X.com ` and `a@x.com` collide.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email does not parse.
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;

        if self.state.users.iter().any(|u| u.email == email) {
            return Err(AuthError::DuplicateEmail);
        }

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = UserRecord {
            id: UserId::generate(),
            name: name.trim().to_owned(),
            email,
            password_hash,
            created_at: Utc::now(),
        };

        let session = Session::from(&user);
        tracing::info!(user_id = %user.id, "registered user");

        self.state.users.push(user);
        self.state.user = Some(session.clone());
        self.persist()?;

        Ok(session)
    }

    /// Log in with email and password, establishing a session on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoSuchAccount` if no account matches the
    /// normalized email (including emails that don't parse - no record can
    /// exist for one). Returns `AuthError::WrongPassword` on hash mismatch.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Session, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::NoSuchAccount);
        };

        let user = self
            .state
            .users
            .iter()
            .find(|u| u.email == email)
            .ok_or(AuthError::NoSuchAccount)?;

        verify_password(password, &user.password_hash)?;

        let session = Session::from(user);
        tracing::info!(user_id = %session.id, "logged in");

        self.state.user = Some(session.clone());
        self.persist()?;

        Ok(session)
    }

    /// Clear the current session. Idempotent: a no-op with no session.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if persisting the new state fails.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        if self.state.user.take().is_some() {
            tracing::info!("logged out");
        }
        self.persist()
    }

    /// Ensure the well-known demo account exists, without logging in and
    /// without duplicating or overwriting an existing record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails, or a storage
    /// error from persisting.
    pub fn seed_demo(&mut self) -> Result<(), AuthError> {
        let email = Email::parse(DEMO_EMAIL)?;
        if self.state.users.iter().any(|u| u.email == email) {
            return Ok(());
        }

        let user = UserRecord {
            id: UserId::new("usr_demo"),
            name: DEMO_NAME.to_owned(),
            email,
            password_hash: hash_password(DEMO_PASSWORD)?,
            created_at: Utc::now(),
        };

        tracing::info!(user_id = %user.id, "seeded demo account");
        self.state.users.push(user);
        self.persist()?;
        Ok(())
    }

    /// The current session, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&Session> {
        self.state.user.as_ref()
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.state.user.is_some()
    }

    /// Number of registered users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.state.users.len()
    }

    fn persist(&self) -> Result<(), StorageError> {
        persist::save(self.kv.as_ref(), keys::FARINE_AUTH, &self.state)
    }
}

/// Check password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &PasswordHash) -> Result<(), AuthError> {
    let parsed_hash =
        argon2::password_hash::PasswordHash::new(hash.as_str()).map_err(|_| AuthError::PasswordHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::WrongPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::persist::MemoryStore;

    fn store() -> AuthStore {
        AuthStore::load(Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_register_establishes_session() {
        let mut auth = store();
        let session = auth.register("Ana", "ana@x.com", "secret-123").unwrap();

        assert_eq!(session.name, "Ana");
        assert_eq!(session.email.as_str(), "ana@x.com");
        assert!(auth.is_logged_in());
        assert_eq!(auth.current_user(), Some(&session));
    }

    #[test]
    fn test_register_duplicate_email_normalized() {
        let mut auth = store();
        auth.register("A", "a@x.com", "password1").unwrap();

        // Different case and surrounding whitespace fold to the same key.
        let err = auth.register("B", " A@X.com ", "password2").unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(auth.user_count(), 1);
    }

    #[test]
    fn test_register_rejects_short_password() {
        let mut auth = store();
        let err = auth.register("A", "a@x.com", "short").unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn test_register_trims_name() {
        let mut auth = store();
        let session = auth.register("  Ana  ", "ana@x.com", "secret-123").unwrap();
        assert_eq!(session.name, "Ana");
    }

    #[test]
    fn test_login_wrong_password() {
        let mut auth = store();
        auth.register("A", "a@x.com", "secret-123").unwrap();
        auth.logout().unwrap();

        let err = auth.login("a@x.com", "wrong-password").unwrap_err();
        assert!(matches!(err, AuthError::WrongPassword));
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn test_login_unknown_account() {
        let mut auth = store();
        let err = auth.login("nobody@x.com", "whatever1").unwrap_err();
        assert!(matches!(err, AuthError::NoSuchAccount));
    }

    #[test]
    fn test_login_success_yields_session_without_hash() {
        let mut auth = store();
        let registered = auth.register("A", "a@x.com", "secret-123").unwrap();
        auth.logout().unwrap();

        let session = auth.login("A@X.com ", "secret-123").unwrap();
        assert_eq!(session.id, registered.id);
        assert_eq!(session.email.as_str(), "a@x.com");

        // The serialized session must not carry any password material.
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_logout_idempotent() {
        let mut auth = store();
        auth.logout().unwrap();
        auth.logout().unwrap();
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn test_seed_demo_idempotent() {
        let mut auth = store();
        auth.seed_demo().unwrap();
        auth.seed_demo().unwrap();

        assert_eq!(auth.user_count(), 1);
        assert!(!auth.is_logged_in());

        let session = auth.login(DEMO_EMAIL, DEMO_PASSWORD).unwrap();
        assert_eq!(session.id, UserId::new("usr_demo"));
    }

    #[test]
    fn test_session_survives_reload() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let mut auth = AuthStore::load(Arc::clone(&kv)).unwrap();
            auth.register("A", "a@x.com", "secret-123").unwrap();
        }
        let auth = AuthStore::load(kv).unwrap();
        assert!(auth.is_logged_in());
        assert_eq!(auth.current_user().unwrap().email.as_str(), "a@x.com");
    }

    #[test]
    fn test_hash_password_salted() {
        let a = hash_password("secret-123").unwrap();
        let b = hash_password("secret-123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret-123", &a).is_ok());
        assert!(verify_password("secret-123", &b).is_ok());
    }
}
