//! Wallet connection state machine.
//!
//! ```text
//!  Disconnected ──connect()──▶ Connecting ──provider ok──▶ Connected(addr)
//!       ▲                          │                           │
//!       └──── provider err ────────┘                           │
//!       └──────────────────── disconnect() ────────────────────┘
//! ```
//!
//! A `disconnect()` while `Connecting` cancels the attempt: whatever the
//! provider eventually returns for it is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use verdict_types::WalletAddress;

use crate::error::WalletError;
use crate::provider::WalletProvider;

/// Observable connection state of a wallet session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// A provider `connect` is in flight. `attempt` identifies it so a late
    /// answer to a cancelled attempt can be recognised.
    Connecting { attempt: u64 },
    Connected(WalletAddress),
}

/// The voter's wallet session.
///
/// State lives in a `watch` channel so a front end can [`subscribe`] and
/// re-render on every transition.
///
/// [`subscribe`]: WalletSession::subscribe
pub struct WalletSession<W> {
    provider: W,
    state: watch::Sender<ConnectionState>,
    attempts: AtomicU64,
}

impl<W: WalletProvider> WalletSession<W> {
    pub fn new(provider: W) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            provider,
            state,
            attempts: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> &W {
        &self.provider
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.state.borrow(), ConnectionState::Connected(_))
    }

    /// True while a connect is in flight (drives "loading" indicators).
    pub fn is_connecting(&self) -> bool {
        matches!(*self.state.borrow(), ConnectionState::Connecting { .. })
    }

    /// The connected address; `None` unless `Connected`.
    pub fn address(&self) -> Option<WalletAddress> {
        match &*self.state.borrow() {
            ConnectionState::Connected(address) => Some(address.clone()),
            _ => None,
        }
    }

    /// Connect through the provider.
    ///
    /// Already connected: returns the current address without asking the
    /// provider again. Connect already in flight: fails with
    /// [`WalletError::ConnectInProgress`]. Dropping the returned future
    /// before it completes leaves the session `Disconnected`.
    pub async fn connect(&self) -> Result<WalletAddress, WalletError> {
        let mut existing = None;
        let mut busy = false;
        let mut attempt = 0;
        self.state.send_if_modified(|state| match state {
            ConnectionState::Connected(address) => {
                existing = Some(address.clone());
                false
            }
            ConnectionState::Connecting { .. } => {
                busy = true;
                false
            }
            ConnectionState::Disconnected => {
                attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
                *state = ConnectionState::Connecting { attempt };
                true
            }
        });
        if let Some(address) = existing {
            return Ok(address);
        }
        if busy {
            return Err(WalletError::ConnectInProgress);
        }

        tracing::debug!(attempt, "connecting wallet");
        let mut pending = PendingAttempt {
            state: &self.state,
            attempt,
            settled: false,
        };
        let result = match self.provider.connect().await {
            Ok(raw) => WalletAddress::parse(raw).map_err(WalletError::from),
            Err(e) => Err(e),
        };
        pending.settled = true;

        let mut applied = false;
        self.state.send_if_modified(|state| {
            if *state != (ConnectionState::Connecting { attempt }) {
                return false;
            }
            applied = true;
            *state = match &result {
                Ok(address) => ConnectionState::Connected(address.clone()),
                Err(_) => ConnectionState::Disconnected,
            };
            true
        });

        if !applied {
            tracing::info!(attempt, "wallet connect finished after disconnect, discarding");
            if result.is_ok() {
                self.provider.disconnect().await;
            }
            return Err(WalletError::Cancelled);
        }

        match &result {
            Ok(address) => tracing::info!(address = %address.truncated(), "wallet connected"),
            Err(e) => tracing::warn!("wallet connect failed: {e}"),
        }
        result
    }

    /// Drop the connection and clear the address immediately.
    pub async fn disconnect(&self) {
        let mut previous = ConnectionState::Disconnected;
        self.state.send_if_modified(|state| {
            previous = std::mem::replace(state, ConnectionState::Disconnected);
            previous != ConnectionState::Disconnected
        });
        match previous {
            ConnectionState::Connected(address) => {
                self.provider.disconnect().await;
                tracing::info!(address = %address.truncated(), "wallet disconnected");
            }
            ConnectionState::Connecting { attempt } => {
                tracing::info!(attempt, "wallet connect cancelled");
            }
            ConnectionState::Disconnected => {}
        }
    }
}

/// Returns the session to `Disconnected` if a `connect` future is dropped
/// while its provider call is still pending.
struct PendingAttempt<'a> {
    state: &'a watch::Sender<ConnectionState>,
    attempt: u64,
    settled: bool,
}

impl Drop for PendingAttempt<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let attempt = self.attempt;
        let reset = self.state.send_if_modified(|state| {
            if *state != (ConnectionState::Connecting { attempt }) {
                return false;
            }
            *state = ConnectionState::Disconnected;
            true
        });
        if reset {
            tracing::info!(attempt, "wallet connect abandoned");
        }
    }
}
