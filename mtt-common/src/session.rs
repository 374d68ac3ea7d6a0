//! Shared-secret session gate.
//!
//! Exactly one configured password authorizes a session. Sessions carry an
//! explicit expiry timestamp computed at creation (absolute 24 hours from
//! login, renewed only by logging in again) and are checked lazily by
//! timestamp comparison on each authorization query. No process-global
//! flags, no active expiry timer.
//!
//! This module contains only pure session logic. No HTTP framework
//! dependencies; cookie plumbing lives in the web layer.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

/// Session lifetime: absolute from login.
pub fn session_ttl() -> Duration {
    Duration::hours(24)
}

/// One authorized session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Registry of live sessions behind the shared secret.
pub struct SessionRegistry {
    secret: String,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
    pub fn new(secret: impl Into<String>) -> Self {
        SessionRegistry {
            secret: secret.into(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Establish a session iff `password` exactly equals the configured
    /// secret. Failure is generic: there are no distinct users, so no
    /// cause is distinguished.
    pub fn authenticate(&self, password: &str) -> Option<Session> {
        self.authenticate_at(password, Utc::now())
    }

    fn authenticate_at(&self, password: &str, now: DateTime<Utc>) -> Option<Session> {
        if password != self.secret {
            return None;
        }
        let session = Session {
            token: Uuid::new_v4(),
            issued_at: now,
            expires_at: now + session_ttl(),
        };
        self.sessions
            .lock()
            .expect("session registry lock poisoned")
            .insert(session.token, session.clone());
        debug!(token = %session.token, "session established");
        Some(session)
    }

    /// True only while the session exists and has not expired. Expired
    /// entries are pruned here, on the query path.
    pub fn is_authorized(&self, token: &Uuid) -> bool {
        self.is_authorized_at(token, Utc::now())
    }

    fn is_authorized_at(&self, token: &Uuid, now: DateTime<Utc>) -> bool {
        let mut sessions = self
            .sessions
            .lock()
            .expect("session registry lock poisoned");
        match sessions.get(token) {
            Some(session) if !session.is_expired(now) => true,
            Some(_) => {
                sessions.remove(token);
                debug!(token = %token, "session expired");
                false
            }
            None => false,
        }
    }

    /// Immediate invalidation. Unknown tokens are a no-op.
    pub fn logout(&self, token: &Uuid) {
        self.sessions
            .lock()
            .expect("session registry lock poisoned")
            .remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "shogolab";

    #[test]
    fn correct_password_establishes_session() {
        let registry = SessionRegistry::new(SECRET);
        let session = registry.authenticate(SECRET).expect("should authenticate");
        assert!(registry.is_authorized(&session.token));
        assert_eq!(session.expires_at - session.issued_at, session_ttl());
    }

    #[test]
    fn wrong_password_establishes_nothing() {
        let registry = SessionRegistry::new(SECRET);
        assert!(registry.authenticate("wrong").is_none());
        assert!(registry.authenticate("").is_none());
        assert!(registry.authenticate("SHOGOLAB").is_none());
        // Whitespace is not stripped; the match is exact
        assert!(registry.authenticate(" shogolab").is_none());
    }

    #[test]
    fn session_valid_until_24_hours_elapse() {
        let registry = SessionRegistry::new(SECRET);
        let issued = Utc::now();
        let session = registry.authenticate_at(SECRET, issued).unwrap();

        let just_before = issued + Duration::hours(24) - Duration::seconds(1);
        assert!(registry.is_authorized_at(&session.token, just_before));

        let at_expiry = issued + Duration::hours(24);
        assert!(!registry.is_authorized_at(&session.token, at_expiry));

        // Expired entry was pruned; still unauthorized at earlier times
        assert!(!registry.is_authorized_at(&session.token, just_before));
    }

    #[test]
    fn logout_invalidates_immediately() {
        let registry = SessionRegistry::new(SECRET);
        let session = registry.authenticate(SECRET).unwrap();
        assert!(registry.is_authorized(&session.token));

        registry.logout(&session.token);
        assert!(!registry.is_authorized(&session.token));
    }

    #[test]
    fn unknown_token_is_unauthorized() {
        let registry = SessionRegistry::new(SECRET);
        assert!(!registry.is_authorized(&Uuid::new_v4()));
    }

    #[test]
    fn relogin_issues_independent_session() {
        let registry = SessionRegistry::new(SECRET);
        let first = registry.authenticate(SECRET).unwrap();
        let second = registry.authenticate(SECRET).unwrap();
        assert_ne!(first.token, second.token);

        registry.logout(&first.token);
        assert!(registry.is_authorized(&second.token));
    }
}
