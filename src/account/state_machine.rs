// Account lifecycle engine
//
// The legal transitions are declared as a table; the engine matches the
// current state and event kind against it and applies the target state.
// Handlers never pick the target themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::types::AccountState;

/// Events that can drive an account through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEvent {
    /// Owner submitted a creation form
    Submit,
    /// Reviewer approved the application
    Approve,
    /// Reviewer rejected the application
    Reject { reason: String },
}

impl AccountEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AccountEvent::Submit => EventKind::Submit,
            AccountEvent::Approve => EventKind::Approve,
            AccountEvent::Reject { .. } => EventKind::Reject,
        }
    }
}

/// Payload-free discriminant used for table lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Submit,
    Approve,
    Reject,
}

/// Declared transition table: (from, event, to)
pub const TRANSITIONS: &[(AccountState, EventKind, AccountState)] = &[
    (
        AccountState::NonExistent,
        EventKind::Submit,
        AccountState::ApprovalPending,
    ),
    (
        AccountState::ApprovalPending,
        EventKind::Approve,
        AccountState::Active,
    ),
    (
        AccountState::ApprovalPending,
        EventKind::Reject,
        AccountState::Rejected,
    ),
];

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("event {event:?} not allowed in state {state}")]
    InvalidTransition {
        state: AccountState,
        event: EventKind,
    },
}

/// Record of an applied transition, kept for audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: AccountState,
    pub to: AccountState,
    pub event: EventKind,
    pub timestamp: DateTime<Utc>,
}

/// Interpreter for the declared transition table
#[derive(Debug)]
pub struct AccountLifecycle {
    current: AccountState,
    history: Vec<TransitionRecord>,
}

impl AccountLifecycle {
    pub fn new(state: AccountState) -> Self {
        Self {
            current: state,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> AccountState {
        self.current
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Whether the table declares a transition for this event from the
    /// current state
    pub fn can_handle(&self, event: &AccountEvent) -> bool {
        self.lookup(event.kind()).is_some()
    }

    /// Apply an event. Returns the new state, or an error when no declared
    /// transition matches.
    pub fn handle(&mut self, event: &AccountEvent) -> Result<AccountState, TransitionError> {
        let kind = event.kind();
        let to = self
            .lookup(kind)
            .ok_or(TransitionError::InvalidTransition {
                state: self.current,
                event: kind,
            })?;

        let record = TransitionRecord {
            from: self.current,
            to,
            event: kind,
            timestamp: Utc::now(),
        };
        info!(
            from = %record.from,
            to = %record.to,
            event = ?record.event,
            "account state transition"
        );
        self.history.push(record);
        self.current = to;
        Ok(to)
    }

    fn lookup(&self, kind: EventKind) -> Option<AccountState> {
        TRANSITIONS
            .iter()
            .find(|(from, event, _)| *from == self.current && *event == kind)
            .map(|(_, _, to)| *to)
    }
}
