//! User-facing notifications.
//!
//! The core never pops dialogs itself. Each session operation reports its
//! outcome as a [`Notice`] to a [`Notifier`] supplied by the front end.

use std::fmt;

use verdict_types::{PollId, WalletAddress};

/// Something the user should be told about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    WalletConnected(WalletAddress),
    WalletDisconnected,
    PollCreated { poll_id: Option<PollId> },
    VoteCast { poll_id: PollId },
    /// An operation failed; `message` is ready to show as is.
    Failed { message: String },
}

impl Notice {
    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::Failed { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::WalletConnected(address) => {
                write!(f, "Wallet connected: {}", address.truncated())
            }
            Notice::WalletDisconnected => write!(f, "Wallet disconnected"),
            Notice::PollCreated { .. } => write!(f, "Poll created successfully!"),
            Notice::VoteCast { .. } => write!(f, "Vote cast successfully!"),
            Notice::Failed { message } => write!(f, "{message}"),
        }
    }
}

/// Receives notices from a [`crate::ClientSession`].
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

impl<F> Notifier for F
where
    F: Fn(&Notice) + Send + Sync,
{
    fn notify(&self, notice: &Notice) {
        self(notice)
    }
}

/// Writes notices to the log. Used when no front end is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_failure() {
            tracing::warn!("{notice}");
        } else {
            tracing::info!("{notice}");
        }
    }
}
