//! reqwest-backed implementation of [`PollTransport`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use verdict_types::{
    CreatePollRequest, CreatePollResponse, ErrorBody, Poll, PollId, PollsResponse,
    ServiceHealth, VoteRequest, VoteResponse,
};

use crate::error::TransportError;
use crate::transport::PollTransport;

/// Default whole-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const FETCH_FAILED: &str = "Failed to fetch polls";
const CREATE_FAILED: &str = "Failed to create poll";
const VOTE_FAILED: &str = "Failed to vote";

/// HTTP client for the poll service.
///
/// Wraps `reqwest::Client` with the service's base URL and provides typed
/// methods for each endpoint the client core needs.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given base URL (e.g. `http://localhost:8080`)
    /// using the default timeouts.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeouts(base_url, DEFAULT_REQUEST_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured service URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> Result<T, TransportError> {
        tracing::debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response, fallback).await?;
        response
            .json()
            .await
            .map_err(|e| TransportError::Malformed(e.to_string()))
    }

    /// POST a JSON body. Once the service has accepted the request the
    /// mutation has happened, so an unreadable success body degrades to
    /// `T::default()` instead of failing.
    async fn post<B: Serialize, T: DeserializeOwned + Default>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, TransportError> {
        tracing::debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response, fallback).await?;
        match response.json::<T>().await {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::debug!(path, "ignoring unreadable success body: {e}");
                Ok(T::default())
            }
        }
    }
}

fn map_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Unreachable(e.to_string())
    }
}

/// Turn a non-success status into [`TransportError::Rejected`], preferring the
/// service's own `{"error": ...}` text over `fallback`.
async fn check_status(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.text().await {
        Ok(text) => serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.is_empty())
            .unwrap_or_else(|| fallback.to_string()),
        Err(e) if e.is_timeout() => return Err(TransportError::Timeout),
        Err(_) => fallback.to_string(),
    };
    tracing::debug!(status = status.as_u16(), %message, "service rejected request");
    Err(TransportError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl PollTransport for HttpTransport {
    async fn fetch_polls(&self) -> Result<Vec<Poll>, TransportError> {
        let response: PollsResponse = self.get("/polls", FETCH_FAILED).await?;
        Ok(response.polls)
    }

    async fn fetch_poll(&self, id: PollId) -> Result<Poll, TransportError> {
        self.get(&format!("/polls/{id}"), "Poll not found").await
    }

    async fn create_poll(
        &self,
        request: &CreatePollRequest,
    ) -> Result<CreatePollResponse, TransportError> {
        self.post("/polls", request, CREATE_FAILED).await
    }

    async fn vote(&self, request: &VoteRequest) -> Result<VoteResponse, TransportError> {
        self.post("/vote", request, VOTE_FAILED).await
    }

    async fn ping(&self) -> Result<ServiceHealth, TransportError> {
        self.get("/ping", "Service unavailable").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use verdict_types::WalletAddress;

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn vote_request() -> VoteRequest {
        VoteRequest {
            poll_id: PollId::new(1),
            option_index: 0,
            voter_address: WalletAddress::parse("voter").unwrap(),
        }
    }

    #[tokio::test]
    async fn fetch_polls_parses_list() {
        let router = Router::new().route(
            "/polls",
            get(|| async {
                Json(json!({
                    "polls": [{
                        "id": 1, "question": "Q?", "options": ["A", "B"],
                        "vote_counts": [0, 0], "total_votes": 0,
                        "created_at": "2024-10-05T12:00:00Z", "creator_address": "c"
                    }],
                    "count": 1
                }))
            }),
        );
        let transport = HttpTransport::new(serve(router).await).unwrap();
        let polls = transport.fetch_polls().await.unwrap();
        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].options, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn fetch_polls_null_list_is_empty() {
        let router = Router::new().route("/polls", get(|| async { Json(json!({"polls": null})) }));
        let transport = HttpTransport::new(serve(router).await).unwrap();
        assert!(transport.fetch_polls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_polls_garbage_is_malformed() {
        let router = Router::new().route("/polls", get(|| async { "not json" }));
        let transport = HttpTransport::new(serve(router).await).unwrap();
        assert!(matches!(
            transport.fetch_polls().await,
            Err(TransportError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn vote_rejection_surfaces_service_message() {
        let router = Router::new().route(
            "/vote",
            post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "Poll closed"}))) }),
        );
        let transport = HttpTransport::new(serve(router).await).unwrap();
        let err = transport.vote(&vote_request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Poll closed");
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn vote_rejection_without_body_uses_fallback() {
        let router = Router::new().route(
            "/vote",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let transport = HttpTransport::new(serve(router).await).unwrap();
        let err = transport.vote(&vote_request()).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Rejected {
                status: 500,
                message: "Failed to vote".into()
            }
        );
    }

    #[tokio::test]
    async fn vote_sends_service_field_names() {
        let router = Router::new().route(
            "/vote",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["poll_id"], 1);
                assert_eq!(body["option_index"], 0);
                assert_eq!(body["voter_address"], "voter");
                Json(json!({
                    "message": "Vote cast successfully",
                    "blockchain_info": {"tx_id": "simulated_vote_tx_1", "vote_address": "V1",
                                        "status": "confirmed"}
                }))
            }),
        );
        let transport = HttpTransport::new(serve(router).await).unwrap();
        let response = transport.vote(&vote_request()).await.unwrap();
        let receipt = response.blockchain_info.unwrap();
        assert_eq!(receipt.tx_id.as_deref(), Some("simulated_vote_tx_1"));
        assert_eq!(receipt.address.as_deref(), Some("V1"));
    }

    #[tokio::test]
    async fn create_success_with_empty_body_is_still_success() {
        let router = Router::new().route("/polls", post(|| async { StatusCode::CREATED }));
        let transport = HttpTransport::new(serve(router).await).unwrap();
        let request = CreatePollRequest {
            question: "Q?".into(),
            options: vec!["A".into(), "B".into()],
            creator_address: WalletAddress::parse("creator").unwrap(),
        };
        let response = transport.create_poll(&request).await.unwrap();
        assert_eq!(response, CreatePollResponse::default());
    }

    #[tokio::test]
    async fn fetch_single_poll_and_ping() {
        let router = Router::new()
            .route(
                "/polls/:id",
                get(|Path(id): Path<u64>| async move {
                    Json(json!({"id": id, "question": "Q?", "options": ["A", "B"],
                                "vote_counts": [1, 1], "total_votes": 2}))
                }),
            )
            .route(
                "/ping",
                get(|| async {
                    Json(json!({"message": "pong", "database": "connected",
                                "blockchain": "connected", "smart_contract": "enabled"}))
                }),
            );
        let transport = HttpTransport::new(serve(router).await).unwrap();
        let poll = transport.fetch_poll(PollId::new(9)).await.unwrap();
        assert_eq!(poll.id, PollId::new(9));
        let health = transport.ping().await.unwrap();
        assert!(health.database_connected());
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let router = Router::new().route(
            "/polls",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"polls": []}))
            }),
        );
        let transport = HttpTransport::with_timeouts(
            serve(router).await,
            Duration::from_millis(100),
            Duration::from_millis(100),
        )
        .unwrap();
        assert_eq!(transport.fetch_polls().await, Err(TransportError::Timeout));
    }

    #[tokio::test]
    async fn unreachable_service() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let transport = HttpTransport::new(format!("http://{addr}")).unwrap();
        assert!(matches!(
            transport.fetch_polls().await,
            Err(TransportError::Unreachable(_))
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:8080/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080");
    }
}
