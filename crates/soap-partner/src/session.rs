//! Authentication state for one client instance.
//!
//! Mutated only by login/logout; data operations read it. The client
//! exposes login as `&mut self` and data operations as `&self`, so
//! concurrent session mutation against in-flight reads cannot compile.

use crate::error::{Error, ErrorKind, Result};
use crate::types::UserInfo;

/// An established session: token, endpoint, and identity metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    session_id: String,
    server_url: String,
    user_info: Option<UserInfo>,
}

impl Session {
    pub fn new(
        session_id: impl Into<String>,
        server_url: impl Into<String>,
        user_info: Option<UserInfo>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            server_url: server_url.into(),
            user_info,
        }
    }

    /// The opaque session token.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The endpoint all non-login calls must be sent to.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Identity metadata from the login/getUserInfo reply.
    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }
}

/// The authentication state machine.
///
/// `Failed` retains the last good session (if any) for inspection, but a
/// failed attempt never silently keeps operating on it; the caller must
/// log in again. `Failed` does not block retries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(Session),
    Failed {
        last: Option<Session>,
    },
}

impl SessionState {
    /// Adopt a session after a successful login/getUserInfo call,
    /// overwriting whatever was there.
    pub fn authenticate(&mut self, session: Session) {
        *self = SessionState::Authenticated(session);
    }

    /// Record a rejected or invalid login attempt.
    pub fn fail(&mut self) {
        let last = match std::mem::take(self) {
            SessionState::Authenticated(session) => Some(session),
            SessionState::Failed { last } => last,
            SessionState::Unauthenticated => None,
        };
        *self = SessionState::Failed { last };
    }

    /// Explicit logout: drop everything.
    pub fn reset(&mut self) {
        *self = SessionState::Unauthenticated;
    }

    /// The current session, only while authenticated.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// The session for a data operation, or the fail-fast error that
    /// prevents a network call.
    pub fn require_authenticated(&self) -> Result<&Session> {
        self.session()
            .ok_or_else(|| Error::new(ErrorKind::NotLoggedIn))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}
