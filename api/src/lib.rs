//! Transport layer for the Verdict poll service.
//!
//! [`PollTransport`] is the seam the client core is written against;
//! [`HttpTransport`] speaks the service's HTTP/JSON contract:
//! - `GET /polls` and `GET /polls/{id}`
//! - `POST /polls` to create a poll
//! - `POST /vote` to cast a vote
//! - `GET /ping` for service health

pub mod error;
pub mod http;
pub mod transport;

pub use error::TransportError;
pub use http::HttpTransport;
pub use transport::PollTransport;
