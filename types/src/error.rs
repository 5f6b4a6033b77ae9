//! Errors raised while constructing core types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("wallet address is empty")]
    EmptyAddress,

    #[error("wallet address contains whitespace: {0:?}")]
    AddressWhitespace(String),
}
