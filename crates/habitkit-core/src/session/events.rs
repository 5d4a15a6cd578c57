use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every completed session transition produces an event.
/// The presentation layer polls for these to react to sign-in state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Startup restore finished; `authenticated` tells whether a stored
    /// session was found and accepted.
    BootstrapCompleted {
        authenticated: bool,
        at: DateTime<Utc>,
    },
    LoggedIn {
        username: String,
        at: DateTime<Utc>,
    },
    LoggedOut {
        at: DateTime<Utc>,
    },
    /// The gateway reported the bearer token invalid; the session was
    /// cleared without user action.
    Evicted {
        at: DateTime<Utc>,
    },
}
