use thiserror::Error;

use verdict_types::TypesError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("wallet connection already in progress")]
    ConnectInProgress,

    #[error("wallet connection cancelled")]
    Cancelled,

    #[error("wallet provider error: {0}")]
    Provider(String),

    #[error("invalid wallet address: {0}")]
    InvalidAddress(#[from] TypesError),
}
