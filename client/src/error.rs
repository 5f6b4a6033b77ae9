//! Error taxonomy of the client core.
//!
//! Every variant is recoverable: validation errors by correcting input,
//! transport errors by retrying, state errors by completing the missing
//! prerequisite (connect the wallet, pick an option, refresh).

use thiserror::Error;

use verdict_api::TransportError;
use verdict_types::{OptionIndex, PollId};
use verdict_wallet::WalletError;

/// Malformed user input, caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a question")]
    EmptyQuestion,

    #[error("Please provide at least 2 options")]
    TooFewOptions { found: usize },

    #[error("Poll cannot have more than {max} options")]
    TooManyOptions { found: usize, max: usize },
}

/// An action attempted before its prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Please connect your wallet first")]
    WalletNotConnected,

    #[error("Please select an option before voting")]
    NoSelection { poll_id: PollId },

    #[error("Poll {poll_id} is no longer available")]
    UnknownPoll { poll_id: PollId },

    #[error("Option {option_index} no longer exists on poll {poll_id}, please choose again")]
    StaleSelection {
        poll_id: PollId,
        option_index: OptionIndex,
    },
}

/// Failure of a [`crate::PollStore`] mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The single error type surfaced at the orchestration boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl ClientError {
    /// The message to show the user. Service-provided messages pass through
    /// unchanged.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<StoreError> for ClientError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(e) => ClientError::Validation(e),
            StoreError::Transport(e) => ClientError::Transport(e),
        }
    }
}

/// Failure to load a [`crate::ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(String),
}
