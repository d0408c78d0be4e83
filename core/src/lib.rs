//! Synchronous client for the Notify My Android (NMA) public API.
//!
//! # Overview
//! Implements the two operations the API exposes — `notify` and `verify` —
//! as one blocking HTTPS POST each. Fields are validated locally before any
//! I/O, serialized as a form-urlencoded body, and the server's small XML
//! envelope (`<nma><success .../></nma>` or `<nma><error ...>msg</error></nma>`)
//! is interpreted into a per-call `Result`.
//!
//! # Design
//! - `NmaClient` holds only a base URL and a `Transport`; it carries no
//!   mutable state between calls. Every call returns its own error value,
//!   so there is no shared "last error" slot to race on.
//! - Each operation is split into a `build_*` method that produces an
//!   `HttpRequest` and a `parse_reply` method that consumes an
//!   `HttpResponse`, keeping the I/O boundary explicit and the interesting
//!   logic deterministic and testable without a network.
//! - `UreqTransport` is the default executor; tests inject their own
//!   `Transport` to prove validation short-circuits before I/O.

pub mod client;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::{NmaClient, DEFAULT_BASE_URL, NOTIFY_PATH, VERIFY_PATH};
pub use error::NmaError;
pub use http::{HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Notification, Verification};
