//! The client's cache of polls and the operations that synchronize it.
//!
//! The service is the only authority on polls and tallies. The cache is
//! replaced wholesale by [`PollStore::refresh`] and nothing else: creating
//! a poll or casting a vote never edits it, callers refresh afterwards.
//!
//! Overlapping refreshes are ordered by a sequence number taken when each
//! one starts. A response is applied only if no later-started refresh has
//! been applied already, so a slow stale response cannot overwrite a newer
//! list.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use verdict_api::{PollTransport, TransportError};
use verdict_types::{
    CreatePollRequest, CreatePollResponse, OptionIndex, Poll, PollId, VoteRequest, VoteResponse,
    WalletAddress,
};

use crate::error::{StoreError, ValidationError};

/// Default cap on options per poll, matching the service.
pub const DEFAULT_MAX_OPTIONS: usize = 10;

/// A complete poll list as of one applied refresh.
#[derive(Clone, Debug, Default)]
pub struct PollCatalog {
    polls: Arc<Vec<Poll>>,
    sequence: u64,
}

impl PollCatalog {
    pub fn polls(&self) -> &Arc<Vec<Poll>> {
        &self.polls
    }

    /// Sequence number of the refresh that produced this list; 0 before the
    /// first successful refresh.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// A validated poll ready to submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollDraft {
    pub question: String,
    pub options: Vec<String>,
}

impl PollDraft {
    /// Trim the question and every option, drop blank options, and check the
    /// result has a question and between 2 and `max_options` options.
    pub fn new<S: AsRef<str>>(
        question: &str,
        options: &[S],
        max_options: usize,
    ) -> Result<Self, ValidationError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        let options: Vec<String> = options
            .iter()
            .map(|o| o.as_ref().trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if options.len() < 2 {
            return Err(ValidationError::TooFewOptions {
                found: options.len(),
            });
        }
        if options.len() > max_options {
            return Err(ValidationError::TooManyOptions {
                found: options.len(),
                max: max_options,
            });
        }
        Ok(Self {
            question: question.to_string(),
            options,
        })
    }
}

/// Single source of truth for poll data on the client.
pub struct PollStore<T> {
    transport: T,
    catalog: watch::Sender<PollCatalog>,
    issued: AtomicU64,
    max_options: usize,
}

impl<T: PollTransport> PollStore<T> {
    pub fn new(transport: T) -> Self {
        let (catalog, _) = watch::channel(PollCatalog::default());
        Self {
            transport,
            catalog,
            issued: AtomicU64::new(0),
            max_options: DEFAULT_MAX_OPTIONS,
        }
    }

    pub fn with_max_options(mut self, max_options: usize) -> Self {
        self.max_options = max_options;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn max_options(&self) -> usize {
        self.max_options
    }

    /// The cached polls. Always a complete list from one refresh.
    pub fn polls(&self) -> Arc<Vec<Poll>> {
        Arc::clone(&self.catalog.borrow().polls)
    }

    pub fn catalog(&self) -> PollCatalog {
        self.catalog.borrow().clone()
    }

    /// Cached poll by id.
    pub fn poll(&self, id: PollId) -> Option<Poll> {
        self.catalog.borrow().polls.iter().find(|p| p.id == id).cloned()
    }

    /// Receiver notified each time a refresh replaces the list.
    pub fn subscribe(&self) -> watch::Receiver<PollCatalog> {
        self.catalog.subscribe()
    }

    /// Fetch every poll and replace the cache.
    ///
    /// On failure the cache is left as it was. When a later-started refresh
    /// has already been applied, this response is dropped and the current
    /// (newer) list is returned.
    pub async fn refresh(&self) -> Result<Arc<Vec<Poll>>, TransportError> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(sequence, "refreshing polls");

        let fetched = match self.transport.fetch_polls().await {
            Ok(polls) => polls,
            Err(e) => {
                tracing::warn!(sequence, "refresh failed, keeping cached polls: {e}");
                return Err(e);
            }
        };
        if let Err(e) = check_polls(&fetched) {
            tracing::warn!(sequence, "refresh rejected, keeping cached polls: {e}");
            return Err(e);
        }

        let count = fetched.len();
        let fetched = Arc::new(fetched);
        let applied = self.catalog.send_if_modified(|catalog| {
            if sequence <= catalog.sequence {
                return false;
            }
            catalog.polls = Arc::clone(&fetched);
            catalog.sequence = sequence;
            true
        });

        if applied {
            tracing::info!(sequence, count, "poll cache replaced");
        } else {
            tracing::debug!(sequence, "discarding out-of-order refresh response");
        }
        Ok(self.polls())
    }

    /// Validate and submit a new poll. The cache is not touched; refresh to
    /// see the poll.
    pub async fn create_poll<S: AsRef<str>>(
        &self,
        question: &str,
        options: &[S],
        creator: &WalletAddress,
    ) -> Result<CreatePollResponse, StoreError> {
        let draft = PollDraft::new(question, options, self.max_options)?;
        let request = CreatePollRequest {
            question: draft.question,
            options: draft.options,
            creator_address: creator.clone(),
        };
        let response = self.transport.create_poll(&request).await?;
        tracing::info!(
            poll_id = ?response.poll.as_ref().map(|p| p.id),
            options = request.options.len(),
            "poll created"
        );
        Ok(response)
    }

    /// Submit a vote. The cache is not touched; refresh to see new tallies.
    pub async fn vote(
        &self,
        poll_id: PollId,
        option_index: OptionIndex,
        voter: &WalletAddress,
    ) -> Result<VoteResponse, TransportError> {
        let request = VoteRequest {
            poll_id,
            option_index,
            voter_address: voter.clone(),
        };
        let response = self.transport.vote(&request).await?;
        tracing::info!(%poll_id, option_index, "vote accepted");
        Ok(response)
    }
}

/// Reject a fetched list that breaks the identity, shape or tally invariants.
fn check_polls(polls: &[Poll]) -> Result<(), TransportError> {
    let mut seen = HashSet::with_capacity(polls.len());
    for poll in polls {
        if !seen.insert(poll.id) {
            return Err(TransportError::Malformed(format!(
                "poll {} listed more than once",
                poll.id
            )));
        }
        if poll.question.trim().is_empty() {
            return Err(TransportError::Malformed(format!(
                "poll {} has no question",
                poll.id
            )));
        }
        if poll.options.len() < 2 {
            return Err(TransportError::Malformed(format!(
                "poll {} has {} options, expected at least 2",
                poll.id,
                poll.options.len()
            )));
        }
        if !poll.tally_is_consistent() {
            return Err(TransportError::Malformed(format!(
                "poll {}: {} vote counts for {} options totalling {}, expected {}",
                poll.id,
                poll.vote_counts.len(),
                poll.options.len(),
                poll.vote_counts.iter().fold(0u64, |acc, &n| acc.saturating_add(n)),
                poll.total_votes
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_nullables::{sample_poll, NullTransport, TransportCall};

    fn creator() -> WalletAddress {
        WalletAddress::parse("creator").unwrap()
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = PollStore::new(NullTransport::new());
        assert!(store.polls().is_empty());
        assert_eq!(store.catalog().sequence(), 0);
    }

    #[tokio::test]
    async fn refresh_replaces_cache() {
        let transport = NullTransport::with_polls(vec![sample_poll(1, "Q?", &["A", "B"], &[1, 1])]);
        let store = PollStore::new(transport);
        let polls = store.refresh().await.unwrap();
        assert_eq!(polls.len(), 1);

        store.transport().set_polls(vec![sample_poll(2, "R?", &["C", "D"], &[0, 0])]);
        store.refresh().await.unwrap();
        let polls = store.polls();
        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].id, PollId::new(2));
        assert_eq!(store.catalog().sequence(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_data() {
        let transport = NullTransport::with_polls(vec![sample_poll(1, "Q?", &["A", "B"], &[0, 0])]);
        let store = PollStore::new(transport);
        store.refresh().await.unwrap();

        store.transport().fail_next_fetch(TransportError::Unreachable("down".into()));
        assert!(store.refresh().await.is_err());
        assert_eq!(store.polls().len(), 1);
    }

    #[tokio::test]
    async fn inconsistent_tally_is_rejected() {
        let mut bad = sample_poll(1, "Q?", &["A", "B"], &[1, 1]);
        bad.total_votes = 5;
        let good = sample_poll(1, "Q?", &["A", "B"], &[1, 1]);
        let store = PollStore::new(NullTransport::with_polls(vec![good]));
        store.refresh().await.unwrap();

        store.transport().set_polls(vec![bad]);
        assert!(matches!(
            store.refresh().await,
            Err(TransportError::Malformed(_))
        ));
        assert_eq!(store.polls()[0].total_votes, 2);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let poll = sample_poll(1, "Q?", &["A", "B"], &[0, 0]);
        let store = PollStore::new(NullTransport::with_polls(vec![poll.clone(), poll]));
        assert!(matches!(
            store.refresh().await,
            Err(TransportError::Malformed(_))
        ));
        assert!(store.polls().is_empty());
    }

    #[tokio::test]
    async fn later_started_refresh_wins() {
        let transport = NullTransport::with_polls(vec![sample_poll(1, "Old?", &["A", "B"], &[0, 0])]);
        let store = PollStore::new(transport);
        let gate = store.transport().gate_next_fetch();

        let (first, second) = tokio::join!(store.refresh(), async {
            store.transport().set_polls(vec![sample_poll(2, "New?", &["C", "D"], &[1, 0])]);
            let second = store.refresh().await;
            gate.release();
            second
        });

        assert_eq!(second.unwrap()[0].id, PollId::new(2));
        // The slow first response finished last but started first.
        assert_eq!(first.unwrap()[0].id, PollId::new(2));
        assert_eq!(store.polls()[0].id, PollId::new(2));
        assert_eq!(store.catalog().sequence(), 2);
    }

    #[tokio::test]
    async fn polls_without_question_or_choices_are_rejected() {
        let store = PollStore::new(NullTransport::with_polls(vec![sample_poll(
            1,
            "Q?",
            &["A", "B"],
            &[0, 0],
        )]));
        store.refresh().await.unwrap();

        store.transport().set_polls(vec![sample_poll(1, "Q?", &["A"], &[0])]);
        assert!(matches!(
            store.refresh().await,
            Err(TransportError::Malformed(_))
        ));

        store.transport().set_polls(vec![sample_poll(1, "  ", &["A", "B"], &[0, 0])]);
        assert!(matches!(
            store.refresh().await,
            Err(TransportError::Malformed(_))
        ));

        assert_eq!(store.polls()[0].options, vec!["A", "B"]);
        assert_eq!(store.catalog().sequence(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let store = PollStore::new(NullTransport::with_polls(vec![sample_poll(
            1,
            "Q?",
            &["A", "B"],
            &[0, 0],
        )]));
        let mut rx = store.subscribe();
        store.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().polls().len(), 1);
    }

    #[tokio::test]
    async fn create_trims_and_drops_blank_options() {
        let store = PollStore::new(NullTransport::new());
        store
            .create_poll("  Best chain?  ", &[" Solana ", "", "  ", "Ethereum"], &creator())
            .await
            .unwrap();
        let calls = store.transport().calls();
        match &calls[..] {
            [TransportCall::CreatePoll(request)] => {
                assert_eq!(request.question, "Best chain?");
                assert_eq!(request.options, vec!["Solana", "Ethereum"]);
            }
            other => panic!("unexpected calls: {other:?}"),
        }
        // Not visible until a refresh.
        assert!(store.polls().is_empty());
        store.refresh().await.unwrap();
        assert_eq!(store.polls().len(), 1);
    }

    #[tokio::test]
    async fn create_with_one_option_never_reaches_the_service() {
        let store = PollStore::new(NullTransport::new());
        let err = store
            .create_poll("Q?", &["only", " ", ""], &creator())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::TooFewOptions { found: 1 }));
        assert_eq!(store.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn create_with_blank_question_never_reaches_the_service() {
        let store = PollStore::new(NullTransport::new());
        let err = store.create_poll("   ", &["A", "B"], &creator()).await.unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::EmptyQuestion));
        assert_eq!(store.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn create_respects_option_cap() {
        let store = PollStore::new(NullTransport::new()).with_max_options(3);
        let err = store
            .create_poll("Q?", &["A", "B", "C", "D"], &creator())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation(ValidationError::TooManyOptions { found: 4, max: 3 })
        );
        assert_eq!(store.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn create_transport_failure_is_reported() {
        let store = PollStore::new(NullTransport::new());
        store.transport().fail_next_create(TransportError::Timeout);
        let err = store.create_poll("Q?", &["A", "B"], &creator()).await.unwrap_err();
        assert_eq!(err, StoreError::Transport(TransportError::Timeout));
    }

    #[tokio::test]
    async fn vote_does_not_touch_cache() {
        let transport = NullTransport::with_polls(vec![sample_poll(1, "Q?", &["A", "B"], &[0, 0])]);
        let store = PollStore::new(transport);
        store.refresh().await.unwrap();
        store
            .vote(PollId::new(1), 0, &WalletAddress::parse("voter").unwrap())
            .await
            .unwrap();
        assert_eq!(store.polls()[0].total_votes, 0);
        store.refresh().await.unwrap();
        assert_eq!(store.polls()[0].vote_counts, vec![1, 0]);
    }

    #[test]
    fn draft_keeps_option_order() {
        let draft = PollDraft::new("Q", &["b", "a", "c"], 10).unwrap();
        assert_eq!(draft.options, vec!["b", "a", "c"]);
    }
}
