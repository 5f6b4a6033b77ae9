//! Nullable infrastructure for deterministic testing.
//!
//! The external collaborators of the client (poll service, wallet) sit
//! behind traits. This crate provides test-friendly implementations that:
//! - Behave like the real collaborator by default
//! - Can be scripted to fail or to stall until released
//! - Record every call for assertions
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod fixtures;
pub mod transport;
pub mod wallet;

pub use fixtures::sample_poll;
pub use transport::{Gate, NullTransport, TransportCall};
pub use wallet::NullWallet;
