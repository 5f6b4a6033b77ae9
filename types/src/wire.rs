//! Request and response bodies of the poll service HTTP contract.

use serde::{Deserialize, Serialize};

use crate::address::WalletAddress;
use crate::poll::{null_as_default, LedgerStatus, OptionIndex, Poll, PollId};

// ── Requests ────────────────────────────────────────────────────────────

/// Body of `POST /polls`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
    pub creator_address: WalletAddress,
}

/// Body of `POST /vote`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub poll_id: PollId,
    pub option_index: OptionIndex,
    pub voter_address: WalletAddress,
}

// ── Responses ───────────────────────────────────────────────────────────

/// Response of `GET /polls`. A missing or `null` list means no polls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub polls: Vec<Poll>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Ledger references attached to a successful create or vote.
///
/// Carried through to callers untouched; nothing in the client acts on them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    #[serde(default)]
    pub tx_id: Option<String>,
    /// `poll_address` for creations, `vote_address` for votes.
    #[serde(default, alias = "poll_address", alias = "vote_address")]
    pub address: Option<String>,
    #[serde(default)]
    pub explorer_url: Option<String>,
    #[serde(default)]
    pub status: Option<LedgerStatus>,
}

/// Success body of `POST /polls`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePollResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub poll: Option<Poll>,
    #[serde(default)]
    pub blockchain_info: Option<LedgerReceipt>,
}

/// Success body of `POST /vote`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub blockchain_info: Option<LedgerReceipt>,
}

/// Error body the service returns alongside non-success statuses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Response of `GET /ping`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub blockchain: String,
    #[serde(default)]
    pub smart_contract: String,
}

impl ServiceHealth {
    pub fn database_connected(&self) -> bool {
        self.database == "connected"
    }

    pub fn blockchain_connected(&self) -> bool {
        self.blockchain == "connected"
    }
}
