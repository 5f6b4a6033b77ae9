//! The transport seam between the client core and the poll service.

use std::future::Future;

use verdict_types::{
    CreatePollRequest, CreatePollResponse, Poll, PollId, ServiceHealth, VoteRequest,
    VoteResponse,
};

use crate::error::TransportError;

/// Asynchronous access to the poll service.
///
/// Implemented by [`crate::HttpTransport`] for the real service and by the
/// nullable transport for tests.
pub trait PollTransport: Send + Sync {
    /// Fetch every poll (`GET /polls`).
    fn fetch_polls(&self) -> impl Future<Output = Result<Vec<Poll>, TransportError>> + Send;

    /// Fetch a single poll (`GET /polls/{id}`).
    fn fetch_poll(&self, id: PollId) -> impl Future<Output = Result<Poll, TransportError>> + Send;

    /// Create a poll (`POST /polls`).
    fn create_poll(
        &self,
        request: &CreatePollRequest,
    ) -> impl Future<Output = Result<CreatePollResponse, TransportError>> + Send;

    /// Cast a vote (`POST /vote`).
    fn vote(
        &self,
        request: &VoteRequest,
    ) -> impl Future<Output = Result<VoteResponse, TransportError>> + Send;

    /// Service health (`GET /ping`).
    fn ping(&self) -> impl Future<Output = Result<ServiceHealth, TransportError>> + Send;
}
