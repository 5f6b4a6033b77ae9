//! Fundamental types for the Verdict poll client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! polls and their identifiers, wallet addresses, and the JSON bodies exchanged
//! with the poll service.

pub mod address;
pub mod error;
pub mod poll;
pub mod wire;

pub use address::WalletAddress;
pub use error::TypesError;
pub use poll::{LedgerStatus, OptionIndex, Poll, PollId};
pub use wire::{
    CreatePollRequest, CreatePollResponse, ErrorBody, LedgerReceipt, PollsResponse,
    ServiceHealth, VoteRequest, VoteResponse,
};
