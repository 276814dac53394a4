//! Typed JSON API client.
//!
//! # Overview
//! `ApiClient` issues GET/POST/PUT/DELETE requests against a configured base
//! URL, decodes JSON responses into a caller-chosen type and reports any
//! non-2xx status as a `ClientError` carrying the status code.
//!
//! # Design
//! - `ApiClient` holds only the base URL and a transport. No retries, caching
//!   or timeouts.
//! - Each operation is split into `build_*` (produces request) and `parse`
//!   (consumes response); the network round trip lives behind `Transport`.
//! - Decoded result types are trusted, not validated.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ClientError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{ApiErrorResponse, PaginatedResponse};
