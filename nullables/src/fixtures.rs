//! Poll fixtures.

use chrono::{DateTime, Utc};
use verdict_types::{LedgerStatus, Poll, PollId};

/// A consistent poll: `total_votes` is the sum of `counts`.
pub fn sample_poll(id: u64, question: &str, options: &[&str], counts: &[u64]) -> Poll {
    Poll {
        id: PollId::new(id),
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        vote_counts: counts.to_vec(),
        total_votes: counts.iter().sum(),
        created_at: DateTime::<Utc>::from_timestamp(1_728_131_400, 0).unwrap_or_default(),
        creator_address: "GdXpvGV9Xc5p83qwqoSc2Z6FxhiPJXMSD8ACKq4a4yMX".to_string(),
        tx_id: Some(format!("simulated_tx_{id}")),
        blockchain_address: None,
        status: Some(LedgerStatus::Confirmed),
    }
}
