//! The poll record as served by the poll service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Position of an option within a poll's `options`; doubles as the ballot slot.
pub type OptionIndex = usize;

/// Server-assigned poll identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(u64);

impl PollId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PollId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Ledger anchoring status reported by the service. Display-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    Pending,
    Confirmed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// A poll: a question, its ordered options and per-option tallies.
///
/// The service owns every field; the client only caches what the last
/// successful fetch returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    /// `vote_counts[i]` counts votes for `options[i]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_counts: Vec<u64>,
    #[serde(default)]
    pub total_votes: u64,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub creator_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LedgerStatus>,
}

impl Poll {
    /// Whether the tallies line up with the options and add up to `total_votes`.
    pub fn tally_is_consistent(&self) -> bool {
        self.vote_counts.len() == self.options.len()
            && self.vote_counts.iter().try_fold(0u64, |acc, &n| acc.checked_add(n))
                == Some(self.total_votes)
    }

    /// Votes recorded for the option at `index`, 0 when the slot does not exist.
    pub fn votes_for(&self, index: OptionIndex) -> u64 {
        self.vote_counts.get(index).copied().unwrap_or(0)
    }

    pub fn option(&self, index: OptionIndex) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn has_option(&self, index: OptionIndex) -> bool {
        index < self.options.len()
    }
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
