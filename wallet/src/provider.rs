//! The wallet provider seam and a development implementation.

use std::future::Future;
use std::time::Duration;

use crate::error::WalletError;

/// An external wallet able to hand the client an address.
///
/// `connect` may be slow (user approval in a browser extension, hardware
/// confirmation); the session serializes calls so at most one is in flight.
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for the active account's address.
    fn connect(&self) -> impl Future<Output = Result<String, WalletError>> + Send;

    /// Tell the wallet the client is done with it.
    fn disconnect(&self) -> impl Future<Output = ()> + Send;
}

/// A wallet that always answers with the same address after a fixed delay.
///
/// Stands in for a browser wallet when running against a local service.
#[derive(Clone, Debug)]
pub struct DevWallet {
    address: String,
    delay: Duration,
}

impl DevWallet {
    pub const DEFAULT_ADDRESS: &'static str = "GdXpvGV9Xc5p83qwqoSc2Z6FxhiPJXMSD8ACKq4a4yMX";
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    pub fn new(address: impl Into<String>, delay: Duration) -> Self {
        Self {
            address: address.into(),
            delay,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Default for DevWallet {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ADDRESS, Self::DEFAULT_DELAY)
    }
}

impl WalletProvider for DevWallet {
    async fn connect(&self) -> Result<String, WalletError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        tracing::debug!(address = %self.address, "dev wallet connected");
        Ok(self.address.clone())
    }

    async fn disconnect(&self) {
        tracing::debug!(address = %self.address, "dev wallet disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dev_wallet_returns_its_address() {
        let wallet = DevWallet::new("dev-address", Duration::ZERO);
        assert_eq!(wallet.connect().await.unwrap(), "dev-address");
    }

    #[test]
    fn default_dev_wallet() {
        let wallet = DevWallet::default();
        assert_eq!(wallet.address(), DevWallet::DEFAULT_ADDRESS);
    }
}
