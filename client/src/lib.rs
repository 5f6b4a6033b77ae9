//! Client core for the Verdict poll service.
//!
//! The service owns polls and tallies; this crate keeps a read cache of
//! them and drives the two mutations a voter can make:
//! - [`PollStore`]: the cache, refreshed wholesale from the service
//! - [`SelectionState`]: the options picked but not yet submitted
//! - [`VoteCoordinator`]: vote and poll-creation flows with their
//!   prerequisite checks and follow-up refresh
//! - [`ClientSession`]: all of the above plus a wallet session and a
//!   [`Notifier`] for front ends
//!
//! Percentages and tally strings shown next to options come from
//! [`statistics`].

pub mod config;
pub mod coordinator;
pub mod error;
pub mod notify;
pub mod selection;
pub mod session;
pub mod statistics;
pub mod store;

pub use config::ClientConfig;
pub use coordinator::{PollCreated, VoteCast, VoteCoordinator};
pub use error::{ClientError, ConfigError, StateError, StoreError, ValidationError};
pub use notify::{Notice, Notifier, TracingNotifier};
pub use selection::SelectionState;
pub use session::ClientSession;
pub use statistics::{format_tally, leading_options, option_stats, percentage, OptionStat};
pub use store::{PollCatalog, PollDraft, PollStore, DEFAULT_MAX_OPTIONS};
