//! Login sessions.
//!
//! Sessions live in process memory and are lost on restart. A session token
//! is a random UUID v4 handed back by register/login and presented as
//! `Authorization: Bearer <token>`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use showtime::session::SessionUser;
//!
//! async fn my_bookings(session: SessionUser) -> Result<Json<Value>, AppError> {
//!     // session.user_id is guaranteed valid
//! }
//! ```

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use chrono::{DateTime, Utc};
use showtime_core::environment::{Clock, CurrentUser};
use showtime_core::types::UserId;
use showtime_web::{AppError, BearerToken};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
struct Session {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// Token to user map with a fixed lifetime per session.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(1)),
            clock,
        }
    }

    /// Start a session for `user_id` and return its token.
    ///
    /// Expired sessions are purged first.
    pub async fn issue(&self, user_id: UserId) -> String {
        let now = self.clock.now();
        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now < s.expires_at);
        let purged = before - sessions.len();
        sessions.insert(token.clone(), session);
        drop(sessions);

        tracing::debug!(%user_id, purged, "Session issued");
        token
    }

    /// The user behind a live token. Expired sessions are dropped on sight.
    pub async fn resolve(&self, token: &str) -> Option<UserId> {
        let now = self.clock.now();
        let session = self.sessions.read().await.get(token).copied()?;
        if now < session.expires_at {
            return Some(session.user_id);
        }

        self.sessions.write().await.remove(token);
        tracing::debug!(user_id = %session.user_id, "Session expired");
        None
    }

    /// End a session. Returns `false` if the token was unknown.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Sessions currently held, expired or not.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Authenticated session user.
///
/// Use this as a handler parameter to require authentication; requests
/// without a live bearer token are rejected with 401 `login required`.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The authenticated user ID
    pub user_id: UserId,
    /// The bearer token that resolved to this user
    pub token: String,
}

impl CurrentUser for SessionUser {
    fn current_user_id(&self) -> Option<UserId> {
        Some(self.user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let sessions = Arc::<SessionStore>::from_ref(state);

        let user_id = sessions
            .resolve(&token)
            .await
            .ok_or_else(|| AppError::unauthorized("login required"))?;

        Ok(Self { user_id, token })
    }
}
