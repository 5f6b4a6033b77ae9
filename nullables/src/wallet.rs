//! Nullable wallet: scripted connect results, no browser extension.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

use verdict_wallet::{WalletError, WalletProvider};

use crate::transport::Gate;

/// A wallet provider for tests.
///
/// Answers every connect with its address unless a result or a stall has
/// been queued for the next call.
pub struct NullWallet {
    address: String,
    scripted: Mutex<VecDeque<Result<String, WalletError>>>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl NullWallet {
    pub const DEFAULT_ADDRESS: &'static str = "GdXpvGV9Xc5p83qwqoSc2Z6FxhiPJXMSD8ACKq4a4yMX";

    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            scripted: Mutex::new(VecDeque::new()),
            gates: Mutex::new(VecDeque::new()),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
        }
    }

    /// Queue the result of the next connect.
    pub fn script_connect(&self, result: Result<String, WalletError>) {
        self.scripted.lock().unwrap().push_back(result);
    }

    /// Stall the next connect until the gate is released.
    pub fn gate_next_connect(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        Gate::from_sender(tx)
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

impl Default for NullWallet {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ADDRESS)
    }
}

impl WalletProvider for NullWallet {
    async fn connect(&self) -> Result<String, WalletError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let scripted = self.scripted.lock().unwrap().pop_front();
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        scripted.unwrap_or_else(|| Ok(self.address.clone()))
    }

    async fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}
