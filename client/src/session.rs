//! One user's client: poll cache, wallet, unsubmitted choices, and the
//! notifier that reports outcomes.

use std::sync::Arc;

use verdict_api::{PollTransport, TransportError};
use verdict_types::{OptionIndex, Poll, PollId, WalletAddress};
use verdict_wallet::{ConnectionState, WalletProvider, WalletSession};

use crate::coordinator::{PollCreated, VoteCast, VoteCoordinator};
use crate::error::{ClientError, StateError};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::selection::SelectionState;
use crate::store::PollStore;

pub struct ClientSession<T, W, N = TracingNotifier> {
    store: PollStore<T>,
    wallet: WalletSession<W>,
    selection: SelectionState,
    notifier: N,
}

impl<T: PollTransport, W: WalletProvider> ClientSession<T, W> {
    /// A session that reports outcomes through the log.
    pub fn with_tracing(store: PollStore<T>, wallet: WalletSession<W>) -> Self {
        Self::new(store, wallet, TracingNotifier)
    }
}

impl<T: PollTransport, W: WalletProvider, N: Notifier> ClientSession<T, W, N> {
    pub fn new(store: PollStore<T>, wallet: WalletSession<W>, notifier: N) -> Self {
        Self {
            store,
            wallet,
            selection: SelectionState::new(),
            notifier,
        }
    }

    pub fn store(&self) -> &PollStore<T> {
        &self.store
    }

    pub fn wallet(&self) -> &WalletSession<W> {
        &self.wallet
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn polls(&self) -> Arc<Vec<Poll>> {
        self.store.polls()
    }

    pub fn wallet_state(&self) -> ConnectionState {
        self.wallet.state()
    }

    pub async fn connect_wallet(&self) -> Result<WalletAddress, ClientError> {
        match self.wallet.connect().await {
            Ok(address) => {
                self.notifier.notify(&Notice::WalletConnected(address.clone()));
                Ok(address)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Disconnecting keeps pending choices; they are only sent once a wallet
    /// is connected again.
    pub async fn disconnect_wallet(&self) {
        let was_connected = self.wallet.is_connected();
        self.wallet.disconnect().await;
        if was_connected {
            self.notifier.notify(&Notice::WalletDisconnected);
        }
    }

    /// Reload polls from the service. A failure is reported and the cached
    /// list stays on screen.
    pub async fn refresh(&self) -> Result<Arc<Vec<Poll>>, TransportError> {
        self.store.refresh().await.map_err(|e| {
            self.notifier.notify(&Notice::Failed {
                message: e.to_string(),
            });
            e
        })
    }

    /// Remember `option_index` as the choice for `poll_id`.
    ///
    /// Choosing requires a connected wallet and an option of a cached poll.
    pub fn select(&mut self, poll_id: PollId, option_index: OptionIndex) -> Result<(), StateError> {
        if !self.wallet.is_connected() {
            return Err(StateError::WalletNotConnected);
        }
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
        self.selection.select(poll_id, option_index);
        Ok(())
    }

    pub fn reset_selection(&mut self) {
        self.selection.clear_all();
    }

    /// Submit the pending choice for `poll_id`.
    pub async fn vote(&mut self, poll_id: PollId) -> Result<VoteCast, ClientError> {
        let coordinator = VoteCoordinator::new(&self.store, &self.wallet);
        match coordinator.submit_vote(&mut self.selection, poll_id).await {
            Ok(cast) => {
                self.notifier.notify(&Notice::VoteCast { poll_id });
                Ok(cast)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn create_poll<S: AsRef<str>>(
        &self,
        question: &str,
        options: &[S],
    ) -> Result<PollCreated, ClientError> {
        let coordinator = VoteCoordinator::new(&self.store, &self.wallet);
        match coordinator.publish_poll(question, options).await {
            Ok(created) => {
                self.notifier.notify(&Notice::PollCreated {
                    poll_id: created.poll.as_ref().map(|p| p.id),
                });
                Ok(created)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&self, error: ClientError) -> ClientError {
        self.notifier.notify(&Notice::Failed {
            message: error.user_message(),
        });
        error
    }
}
