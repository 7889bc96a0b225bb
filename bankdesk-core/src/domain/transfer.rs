//! Transfer attempt state machine
//!
//! ```text
//! INITIATED -> AUTHORIZED -> DEBITED -> CREDITED -> LOGGED
//!                               |           |
//!                               +-----------+--> ROLLED_BACK
//! ```
//!
//! `LOGGED` and `ROLLED_BACK` are terminal.

use std::fmt;

use serde::Serialize;

use super::result::{Error, Result};
use super::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferState {
    Initiated,
    Authorized,
    Debited,
    Credited,
    Logged,
    RolledBack,
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferState::Logged | TransferState::RolledBack)
    }

    fn can_advance_to(&self, next: TransferState) -> bool {
        use TransferState::*;
        matches!(
            (self, next),
            (Initiated, Authorized)
                | (Authorized, Debited)
                | (Debited, Credited)
                | (Credited, Logged)
                | (Debited, RolledBack)
                | (Credited, RolledBack)
        )
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransferState::Initiated => "INITIATED",
            TransferState::Authorized => "AUTHORIZED",
            TransferState::Debited => "DEBITED",
            TransferState::Credited => "CREDITED",
            TransferState::Logged => "LOGGED",
            TransferState::RolledBack => "ROLLED_BACK",
        };
        f.write_str(s)
    }
}

/// Tracks one transfer through its states
#[derive(Debug)]
pub struct TransferAttempt {
    state: TransferState,
    history: Vec<TransferState>,
}

impl TransferAttempt {
    pub fn new() -> Self {
        Self {
            state: TransferState::Initiated,
            history: vec![TransferState::Initiated],
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn history(&self) -> &[TransferState] {
        &self.history
    }

    /// Move to `next`; illegal transitions are an engine bug
    pub fn advance(&mut self, next: TransferState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(Error::database(format!(
                "illegal transfer transition {} -> {}",
                self.state, next
            )));
        }
        tracing::debug!(from = %self.state, to = %next, "transfer state change");
        self.state = next;
        self.history.push(next);
        Ok(())
    }
}

impl Default for TransferAttempt {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a completed transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub transaction: Transaction,
    pub states: Vec<TransferState>,
}
