//! Work session lifecycle.
//!
//! A session moves through three states: idle (never started), open
//! (started, still running), and closed (started and stopped). The state is
//! a tagged enum so that an end instant can never exist without a start
//! instant. The core never reads the clock; callers pass `now` in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Km;

/// The start/stop state of a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No session has been started.
    #[default]
    Idle,
    /// A session is running.
    Open { started_at: DateTime<Utc> },
    /// A session has been started and stopped.
    Closed {
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    },
}

impl SessionState {
    /// Returns the string representation of the state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Open { .. } => "open",
            Self::Closed { .. } => "closed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One start-to-stop work interval plus its associated travel distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Session {
    #[serde(flatten)]
    pub state: SessionState,
    pub distance_km: Km,
}

impl Session {
    /// Starts a new interval at `now`.
    ///
    /// From idle or closed, this opens a fresh interval (a previous closed
    /// interval is discarded). While a session is already open this is a
    /// no-op; starting is only allowed once the running session has been
    /// stopped.
    pub fn start(&mut self, now: DateTime<Utc>) {
        match self.state {
            SessionState::Open { started_at } => {
                tracing::debug!(%started_at, "start ignored, session already open");
            }
            SessionState::Idle | SessionState::Closed { .. } => {
                self.state = SessionState::Open { started_at: now };
            }
        }
    }

    /// Stops the open interval at `now`.
    ///
    /// A no-op unless a session is open.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        match self.state {
            SessionState::Open { started_at } => {
                self.state = SessionState::Closed {
                    started_at,
                    ended_at: now,
                };
            }
            SessionState::Idle | SessionState::Closed { .. } => {
                tracing::debug!(state = %self.state, "stop ignored, no open session");
            }
        }
    }

    /// Returns the session to idle, clearing the distance.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.distance_km = Km::ZERO;
    }

    /// True while a session is running.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open { .. })
    }

    /// True once a session has been started and stopped.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed { .. })
    }

    /// The start instant, if the session has one.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Open { started_at } | SessionState::Closed { started_at, .. } => {
                Some(started_at)
            }
        }
    }

    /// The end instant, if the session is closed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SessionState::Closed { ended_at, .. } => Some(ended_at),
            SessionState::Idle | SessionState::Open { .. } => None,
        }
    }

    /// The closed interval length in whole seconds.
    ///
    /// `None` unless the session is closed. An end instant before the start
    /// instant (clock adjustment) yields zero rather than a negative
    /// duration.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<i64> {
        match self.state {
            SessionState::Closed {
                started_at,
                ended_at,
            } => Some((ended_at - started_at).num_seconds().max(0)),
            SessionState::Idle | SessionState::Open { .. } => None,
        }
    }
}
