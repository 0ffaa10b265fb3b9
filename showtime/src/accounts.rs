//! User registration and login.
//!
//! Passwords are stored as argon2 PHC strings. Login never says which of
//! email or password was wrong.

use crate::error::AccountError;
use crate::metrics;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use showtime_core::catalog::{CatalogError, CatalogStore};
use showtime_core::types::{NewUser, User};
use std::sync::Arc;

/// Registration input. `username` defaults to the local part of `email`.
#[derive(Clone, Debug, Default)]
pub struct Registration {
    /// Optional display name
    pub username: Option<String>,
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Hash a password into a PHC string.
///
/// # Errors
///
/// Returns [`AccountError::PasswordHash`] if argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AccountError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. Malformed hashes never match.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn default_username(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Account operations over the catalog's user table.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CatalogStore>,
}

impl AccountService {
    /// Create the service.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// - [`AccountError::Validation`] for blank fields, an email already
    ///   registered or a username already taken
    /// - [`AccountError::PasswordHash`] if hashing fails
    /// - [`AccountError::Catalog`] on storage failure
    #[tracing::instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<User, AccountError> {
        let email = registration.email.trim().to_string();
        let username = registration
            .username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_username(&email))
            .to_string();

        if email.is_empty() || username.is_empty() || registration.password.is_empty() {
            return Err(AccountError::Validation("All fields required.".to_string()));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AccountError::Validation(
                "Email already registered.".to_string(),
            ));
        }

        let password_hash = hash_password(&registration.password)?;
        let created = self
            .store
            .create_user(NewUser {
                username,
                email: email.clone(),
                password_hash,
            })
            .await;

        match created {
            Ok(user) => {
                metrics::record_account_registered();
                tracing::info!(user_id = %user.id, "Account registered");
                Ok(user)
            }
            Err(CatalogError::Conflict(_)) => {
                // Lost a race on the email, or the username is taken.
                let message = if self.store.find_user_by_email(&email).await?.is_some() {
                    "Email already registered."
                } else {
                    "Username already taken."
                };
                Err(AccountError::Validation(message.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Check credentials.
    ///
    /// # Errors
    ///
    /// - [`AccountError::InvalidCredentials`] for an unknown email or wrong password
    /// - [`AccountError::Catalog`] on storage failure
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let user = self
            .store
            .find_user_by_email(email.trim())
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            tracing::info!(user_id = %user.id, "Login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        Ok(user)
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use showtime_testing::InMemoryCatalogStore;

    fn service() -> AccountService {
        AccountService::new(Arc::new(InMemoryCatalogStore::new()))
    }

    fn registration(email: &str) -> Registration {
        Registration {
            username: None,
            email: email.to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_hash_roundtrip() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("Secret", &hash));
        assert!(!verify_password("secret", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_username_defaults_to_email_local_part() {
        let user = service().register(registration("priya@example.com")).await.unwrap();
        assert_eq!(user.username, "priya");
        assert_ne!(user.password_hash, "hunter2");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let accounts = service();
        accounts.register(registration("a@example.com")).await.unwrap();

        let err = accounts
            .register(Registration {
                username: Some("other".to_string()),
                ..registration("a@example.com")
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already registered.");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let accounts = service();
        accounts.register(registration("sam@one.com")).await.unwrap();

        let err = accounts.register(registration("sam@two.com")).await.unwrap_err();
        assert_eq!(err.to_string(), "Username already taken.");
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let err = service()
            .register(Registration {
                password: String::new(),
                ..registration("x@example.com")
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All fields required.");
    }

    #[tokio::test]
    async fn test_login() {
        let accounts = service();
        let user = accounts.register(registration("kay@example.com")).await.unwrap();

        assert_eq!(accounts.login("kay@example.com", "hunter2").await.unwrap().id, user.id);
        assert!(matches!(
            accounts.login("kay@example.com", "wrong").await,
            Err(AccountError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.login("nobody@example.com", "hunter2").await,
            Err(AccountError::InvalidCredentials)
        ));
    }
}
