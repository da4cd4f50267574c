// Session state and the events that drive it

use crate::models::{Identity, SessionToken};

/// Who is logged in, as far as this process knows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Persisted token not yet checked
    #[default]
    Uninitialized,
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, SessionState::Uninitialized)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

/// Messages the session store consumes. Views emit these instead of
/// mutating session state themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn {
        identity: Identity,
        token: SessionToken,
    },
    LoggedOut,
}

/// Failures surfaced by session store operations
#[derive(Debug)]
pub enum SessionError {
    /// The durable token slot could not be written
    Slot(super::slot::SlotError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Slot(e) => write!(f, "Token slot error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<super::slot::SlotError> for SessionError {
    fn from(err: super::slot::SlotError) -> Self {
        SessionError::Slot(err)
    }
}
