//! Blocking HTTP executor behind a trait seam.
//!
//! # Design
//! `NmaClient` talks to the network only through `Transport`, so tests can
//! substitute a stub and prove that validation failures never reach I/O.
//! `UreqTransport` is the production implementation: one synchronous POST
//! per call, no caching, content type set explicitly. Status codes are
//! returned as data (`http_status_as_error(false)`) because interpreting a
//! non-200 reply is the client's job, not the transport's.

use std::time::Duration;

use crate::error::NmaError;
use crate::http::{HttpResponse, FORM_CONTENT_TYPE};

/// Connect + read deadline applied to the whole exchange when the caller
/// does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes one form-encoded POST and reports what came back.
pub trait Transport {
    fn post_form(&self, url: &str, body: &str) -> Result<HttpResponse, NmaError>;
}

/// `Transport` backed by a blocking ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Build a transport whose whole request/response exchange must finish
    /// within `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for UreqTransport {
    fn post_form(&self, url: &str, body: &str) -> Result<HttpResponse, NmaError> {
        let mut response = self
            .agent
            .post(url)
            .content_type(FORM_CONTENT_TYPE)
            .send(body.as_bytes())
            .map_err(|e| NmaError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| NmaError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
