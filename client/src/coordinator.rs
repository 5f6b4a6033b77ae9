//! Vote and poll-creation orchestration.
//!
//! Both flows check the wallet before anything else, mutate through the
//! [`PollStore`], and refresh exactly once after a successful mutation so
//! the cache shows the service's view.

use verdict_api::PollTransport;
use verdict_types::{LedgerReceipt, OptionIndex, Poll, PollId};
use verdict_wallet::{WalletProvider, WalletSession};

use crate::error::{ClientError, StateError};
use crate::selection::SelectionState;
use crate::store::PollStore;

/// A vote the service accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteCast {
    pub poll_id: PollId,
    pub option_index: OptionIndex,
    pub receipt: Option<LedgerReceipt>,
    /// False when the follow-up refresh failed and the cache still shows
    /// the tallies from before the vote.
    pub refreshed: bool,
}

/// A poll the service accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollCreated {
    /// The service's representation, when it sent one.
    pub poll: Option<Poll>,
    pub receipt: Option<LedgerReceipt>,
    pub refreshed: bool,
}

/// Runs the vote and poll-creation flows against a store and a wallet session.
pub struct VoteCoordinator<'a, T, W> {
    store: &'a PollStore<T>,
    wallet: &'a WalletSession<W>,
}

impl<'a, T: PollTransport, W: WalletProvider> VoteCoordinator<'a, T, W> {
    pub fn new(store: &'a PollStore<T>, wallet: &'a WalletSession<W>) -> Self {
        Self { store, wallet }
    }

    /// Submit the voter's selection for `poll_id`.
    ///
    /// Fails without a network call when the wallet is disconnected, when
    /// nothing is selected, or when the selection no longer fits the cached
    /// poll. On success the selection for `poll_id` is cleared; on any
    /// failure it is left for a retry.
    pub async fn submit_vote(
        &self,
        selection: &mut SelectionState,
        poll_id: PollId,
    ) -> Result<VoteCast, ClientError> {
        let voter = self.wallet.address().ok_or(StateError::WalletNotConnected)?;
        let option_index = selection
            .selection(poll_id)
            .ok_or(StateError::NoSelection { poll_id })?;
        self.check_selection(poll_id, option_index)?;

        let response = self.store.vote(poll_id, option_index, &voter).await?;
        let refreshed = self.refresh_after("vote").await;
        selection.clear(poll_id);

        Ok(VoteCast {
            poll_id,
            option_index,
            receipt: response.blockchain_info,
            refreshed,
        })
    }

    /// Create a poll on behalf of the connected wallet.
    pub async fn publish_poll<S: AsRef<str>>(
        &self,
        question: &str,
        options: &[S],
    ) -> Result<PollCreated, ClientError> {
        let creator = self.wallet.address().ok_or(StateError::WalletNotConnected)?;
        let response = self.store.create_poll(question, options, &creator).await?;
        let refreshed = self.refresh_after("poll creation").await;
        Ok(PollCreated {
            poll: response.poll,
            receipt: response.blockchain_info,
            refreshed,
        })
    }

    /// The selection must still name an existing option of a cached poll.
    fn check_selection(&self, poll_id: PollId, option_index: OptionIndex) -> Result<(), StateError> {
        let poll = self
            .store
            .poll(poll_id)
            .ok_or(StateError::UnknownPoll { poll_id })?;
        if !poll.has_option(option_index) {
            return Err(StateError::StaleSelection {
                poll_id,
                option_index,
            });
        }
        Ok(())
    }

    async fn refresh_after(&self, what: &str) -> bool {
        match self.store.refresh().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("{what} succeeded but refresh failed, showing stale polls: {e}");
                false
            }
        }
    }
}
