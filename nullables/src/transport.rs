//! Nullable poll service: an in-memory service behind [`PollTransport`].

use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

use verdict_api::{PollTransport, TransportError};
use verdict_types::{
    CreatePollRequest, CreatePollResponse, LedgerReceipt, LedgerStatus, Poll, PollId,
    ServiceHealth, VoteRequest, VoteResponse,
};

/// Maximum options the emulated service accepts, as the real one does.
const MAX_OPTIONS: usize = 10;

/// A call the transport received, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportCall {
    FetchPolls,
    FetchPoll(PollId),
    CreatePoll(CreatePollRequest),
    Vote(VoteRequest),
    Ping,
}

/// Holds a stalled fetch until released (or dropped).
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub(crate) fn from_sender(tx: oneshot::Sender<()>) -> Self {
        Self(tx)
    }

    pub fn release(self) {
        let _ = self.0.send(());
    }
}

/// An in-memory poll service.
///
/// Applies creates and votes to its own poll list with the real service's
/// rules (two to ten options, one vote per voter, index checks). Failures
/// and stalls can be queued per operation; queued items are consumed in
/// order by the next matching calls.
pub struct NullTransport {
    polls: Mutex<Vec<Poll>>,
    next_id: Mutex<u64>,
    voters: Mutex<HashSet<(PollId, String)>>,
    fetch_failures: Mutex<VecDeque<TransportError>>,
    create_failures: Mutex<VecDeque<TransportError>>,
    vote_failures: Mutex<VecDeque<TransportError>>,
    fetch_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<TransportCall>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::with_polls(Vec::new())
    }

    /// Start with an existing set of polls. They are served as given, so
    /// inconsistent polls can be used to exercise validation.
    pub fn with_polls(polls: Vec<Poll>) -> Self {
        let next_id = polls.iter().map(|p| p.id.as_u64()).max().unwrap_or(0) + 1;
        Self {
            polls: Mutex::new(polls),
            next_id: Mutex::new(next_id),
            voters: Mutex::new(HashSet::new()),
            fetch_failures: Mutex::new(VecDeque::new()),
            create_failures: Mutex::new(VecDeque::new()),
            vote_failures: Mutex::new(VecDeque::new()),
            fetch_gates: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the service-side poll list.
    pub fn set_polls(&self, polls: Vec<Poll>) {
        *self.polls.lock().unwrap() = polls;
    }

    /// Service-side poll list (what the next fetch would return).
    pub fn polls(&self) -> Vec<Poll> {
        self.polls.lock().unwrap().clone()
    }

    pub fn fail_next_fetch(&self, error: TransportError) {
        self.fetch_failures.lock().unwrap().push_back(error);
    }

    pub fn fail_next_create(&self, error: TransportError) {
        self.create_failures.lock().unwrap().push_back(error);
    }

    pub fn fail_next_vote(&self, error: TransportError) {
        self.vote_failures.lock().unwrap().push_back(error);
    }

    /// Queue a non-success status with the service's `error` message.
    pub fn reject_next_vote(&self, status: u16, message: &str) {
        self.fail_next_vote(TransportError::Rejected {
            status,
            message: message.to_string(),
        });
    }

    /// Stall the next fetch until the returned gate is released.
    ///
    /// The stalled fetch answers with the poll list as it was when the
    /// request arrived, like a slow response already in flight.
    pub fn gate_next_fetch(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.fetch_gates.lock().unwrap().push_back(rx);
        Gate(tx)
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn fetch_count(&self) -> usize {
        self.count(|c| matches!(c, TransportCall::FetchPolls))
    }

    pub fn create_count(&self) -> usize {
        self.count(|c| matches!(c, TransportCall::CreatePoll(_)))
    }

    pub fn vote_count(&self) -> usize {
        self.count(|c| matches!(c, TransportCall::Vote(_)))
    }

    /// Forget recorded calls.
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn count(&self, pred: impl Fn(&TransportCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: TransportCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn apply_create(&self, request: &CreatePollRequest) -> Result<CreatePollResponse, TransportError> {
        if request.options.len() < 2 {
            return Err(rejected(400, "Poll must have at least 2 options"));
        }
        if request.options.len() > MAX_OPTIONS {
            return Err(rejected(400, "Poll cannot have more than 10 options"));
        }

        let id = {
            let mut next = self.next_id.lock().unwrap();
            let id = *next;
            *next += 1;
            id
        };
        let created_at = Utc::now();
        let tx_id = format!("simulated_tx_{}", created_at.timestamp());
        let poll = Poll {
            id: PollId::new(id),
            question: request.question.clone(),
            options: request.options.clone(),
            vote_counts: vec![0; request.options.len()],
            total_votes: 0,
            created_at,
            creator_address: request.creator_address.to_string(),
            tx_id: Some(tx_id.clone()),
            blockchain_address: Some(format!("poll_pda_{id}")),
            status: Some(LedgerStatus::Confirmed),
        };
        self.polls.lock().unwrap().push(poll.clone());

        Ok(CreatePollResponse {
            message: Some("Poll created successfully".to_string()),
            blockchain_info: Some(receipt(tx_id, poll.blockchain_address.clone())),
            poll: Some(poll),
        })
    }

    fn apply_vote(&self, request: &VoteRequest) -> Result<VoteResponse, TransportError> {
        let voter = (request.poll_id, request.voter_address.to_string());
        if self.voters.lock().unwrap().contains(&voter) {
            return Err(rejected(400, "User has already voted on this poll"));
        }

        let mut polls = self.polls.lock().unwrap();
        let poll = polls
            .iter_mut()
            .find(|p| p.id == request.poll_id)
            .ok_or_else(|| rejected(404, "Poll not found"))?;
        if request.option_index >= poll.options.len() {
            return Err(rejected(400, "Invalid option index"));
        }
        if poll.vote_counts.len() < poll.options.len() {
            poll.vote_counts.resize(poll.options.len(), 0);
        }
        poll.vote_counts[request.option_index] += 1;
        poll.total_votes += 1;
        drop(polls);

        self.voters.lock().unwrap().insert(voter);
        let tx_id = format!("simulated_vote_tx_{}", Utc::now().timestamp());
        Ok(VoteResponse {
            message: Some("Vote cast successfully".to_string()),
            blockchain_info: Some(receipt(tx_id, Some(format!("vote_pda_{}", request.poll_id)))),
        })
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(status: u16, message: &str) -> TransportError {
    TransportError::Rejected {
        status,
        message: message.to_string(),
    }
}

fn receipt(tx_id: String, address: Option<String>) -> LedgerReceipt {
    LedgerReceipt {
        explorer_url: Some(format!(
            "https://explorer.solana.com/tx/{tx_id}?cluster=devnet"
        )),
        tx_id: Some(tx_id),
        address,
        status: Some(LedgerStatus::Confirmed),
    }
}

impl PollTransport for NullTransport {
    async fn fetch_polls(&self) -> Result<Vec<Poll>, TransportError> {
        self.record(TransportCall::FetchPolls);
        let snapshot = self.polls();
        let failure = self.fetch_failures.lock().unwrap().pop_front();
        let gate = self.fetch_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            // A dropped gate releases the fetch too.
            let _ = gate.await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(snapshot),
        }
    }

    async fn fetch_poll(&self, id: PollId) -> Result<Poll, TransportError> {
        self.record(TransportCall::FetchPoll(id));
        self.polls
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| rejected(404, "Poll not found"))
    }

    async fn create_poll(
        &self,
        request: &CreatePollRequest,
    ) -> Result<CreatePollResponse, TransportError> {
        self.record(TransportCall::CreatePoll(request.clone()));
        let failure = self.create_failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => self.apply_create(request),
        }
    }

    async fn vote(&self, request: &VoteRequest) -> Result<VoteResponse, TransportError> {
        self.record(TransportCall::Vote(request.clone()));
        let failure = self.vote_failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => self.apply_vote(request),
        }
    }

    async fn ping(&self) -> Result<ServiceHealth, TransportError> {
        self.record(TransportCall::Ping);
        Ok(ServiceHealth {
            message: "pong".to_string(),
            database: "connected".to_string(),
            blockchain: "connected".to_string(),
            smart_contract: "enabled".to_string(),
        })
    }
}
