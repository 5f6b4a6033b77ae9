//! Wallet session handling for the Verdict client.
//!
//! The client never talks to a wallet's own protocol. It sees:
//! - [`WalletProvider`]: whatever hands out an address on connect
//! - [`WalletSession`]: the `Disconnected` / `Connecting` / `Connected`
//!   state machine that gates poll creation and voting
//! - [`DevWallet`]: a fixed-address provider for local development

pub mod error;
pub mod provider;
pub mod session;

pub use error::WalletError;
pub use provider::{DevWallet, WalletProvider};
pub use session::{ConnectionState, WalletSession};
