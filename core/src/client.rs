//! Client for the two NMA operations.
//!
//! # Design
//! `NmaClient` holds a base URL and a boxed `Transport` and nothing else.
//! Each operation is split in two: `build_notify` / `build_verify` validate
//! fields and produce an `HttpRequest` (pure, no I/O), and `parse_reply`
//! interprets an `HttpResponse` (status check, then XML envelope). The
//! `notify` and `verify` methods chain the halves through the transport.
//!
//! `Ok(())` corresponds to the upstream library's return value `1`;
//! `NmaError::notify_code` / `verify_code` recover the negative codes.

use std::fmt;

use serde::Serialize;

use crate::error::NmaError;
use crate::http::{HttpRequest, HttpResponse};
use crate::response;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Notification, Verification};
use crate::validate;

/// Production endpoint of the NMA public API.
pub const DEFAULT_BASE_URL: &str = "https://www.notifymyandroid.com";
pub const NOTIFY_PATH: &str = "/publicapi/notify";
pub const VERIFY_PATH: &str = "/publicapi/verify";

/// Wire parameters for `/publicapi/notify`, in the order the upstream
/// library sent them. `developerkey` is omitted entirely when absent,
/// never sent as an empty value.
#[derive(Serialize)]
struct NotifyParams<'a> {
    apikey: &'a str,
    application: &'a str,
    event: &'a str,
    description: &'a str,
    priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    developerkey: Option<&'a str>,
}

/// Wire parameters for `/publicapi/verify`.
#[derive(Serialize)]
struct VerifyParams<'a> {
    apikey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    developerkey: Option<&'a str>,
}

/// Synchronous NMA API client.
pub struct NmaClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl NmaClient {
    /// Client against the production endpoint with the default transport.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternate endpoint, e.g. a local mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_transport(base_url, Box::new(UreqTransport::default()))
    }

    /// Client with a caller-supplied transport. This is the seam tests use
    /// to run without a network.
    pub fn with_transport(base_url: &str, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Validate a notification and encode it as a ready-to-send request.
    /// No I/O happens here.
    pub fn build_notify(&self, notification: &Notification) -> Result<HttpRequest, NmaError> {
        validate::validate_notification(notification)?;
        let params = NotifyParams {
            apikey: &notification.api_key,
            application: &notification.application,
            event: &notification.event,
            description: &notification.description,
            priority: notification.priority,
            developerkey: notification.developer_key.as_deref(),
        };
        Ok(HttpRequest {
            url: format!("{}{NOTIFY_PATH}", self.base_url),
            body: encode(&params)?,
        })
    }

    /// Validate a key check and encode it as a ready-to-send request.
    pub fn build_verify(&self, verification: &Verification) -> Result<HttpRequest, NmaError> {
        validate::validate_verification(verification)?;
        let params = VerifyParams {
            apikey: &verification.api_key,
            developerkey: verification.developer_key.as_deref(),
        };
        Ok(HttpRequest {
            url: format!("{}{VERIFY_PATH}", self.base_url),
            body: encode(&params)?,
        })
    }

    /// Interpret a reply: any status other than 200 is a server-status
    /// error and the body is not touched; on 200 the newline-stripped body
    /// goes to the envelope parser.
    pub fn parse_reply(&self, response: HttpResponse) -> Result<(), NmaError> {
        if response.status != 200 {
            return Err(NmaError::ServerStatus(response.status));
        }
        let flat: String = response.body.lines().collect();
        response::parse_outcome(&flat)
    }

    /// Send a notification: validate, POST, interpret the reply.
    pub fn notify(&self, notification: &Notification) -> Result<(), NmaError> {
        let request = self.build_notify(notification)?;
        let reply = self.transport.post_form(&request.url, &request.body)?;
        self.parse_reply(reply)
    }

    /// Check that an API key is registered with the service.
    pub fn verify(&self, verification: &Verification) -> Result<(), NmaError> {
        let request = self.build_verify(verification)?;
        let reply = self.transport.post_form(&request.url, &request.body)?;
        self.parse_reply(reply)
    }
}

impl Default for NmaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NmaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NmaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn encode<T: Serialize>(params: &T) -> Result<String, NmaError> {
    serde_urlencoded::to_string(params).map_err(|e| NmaError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &str = "http://localhost:3000";

    /// Transport that fails the test if any request reaches it.
    struct NoNetwork;

    impl Transport for NoNetwork {
        fn post_form(&self, url: &str, _body: &str) -> Result<HttpResponse, NmaError> {
            panic!("unexpected network call to {url}");
        }
    }

    fn client() -> NmaClient {
        NmaClient::with_transport(BASE_URL, Box::new(NoNetwork))
    }

    fn key() -> String {
        "0123456789abcdef0123456789abcdef0123456789abcdef".to_string()
    }

    fn notification() -> Notification {
        Notification::new("MyApp", "deploy finished", "build 1234 is live", &key())
    }

    #[test]
    fn build_notify_targets_the_notify_path() {
        let req = client().build_notify(&notification()).unwrap();
        assert_eq!(req.url, "http://localhost:3000/publicapi/notify");
    }

    #[test]
    fn build_notify_body_has_wire_order_and_no_developerkey() {
        let req = client().build_notify(&notification()).unwrap();
        assert_eq!(
            req.body,
            format!(
                "apikey={}&application=MyApp&event=deploy+finished&description=build+1234+is+live&priority=0",
                key()
            )
        );
        assert!(!req.body.contains("developerkey"));
    }

    #[test]
    fn build_notify_includes_developerkey_when_present() {
        let dev = "f".repeat(48);
        let n = notification().with_developer_key(&dev);
        let req = client().build_notify(&n).unwrap();
        assert!(req.body.ends_with(&format!("&developerkey={dev}")));
    }

    #[test]
    fn build_notify_percent_encodes_reserved_characters() {
        let mut n = notification();
        n.description = "50% done & counting".to_string();
        let req = client().build_notify(&n).unwrap();
        assert!(req.body.contains("description=50%25+done+%26+counting"));
    }

    #[test]
    fn build_verify_targets_the_verify_path() {
        let req = client().build_verify(&Verification::new(&key())).unwrap();
        assert_eq!(req.url, "http://localhost:3000/publicapi/verify");
        assert_eq!(req.body, format!("apikey={}", key()));
    }

    #[test]
    fn trailing_slash_in_base_url_is_stripped() {
        let c = NmaClient::with_transport("http://localhost:3000/", Box::new(NoNetwork));
        let req = c.build_verify(&Verification::new(&key())).unwrap();
        assert_eq!(req.url, "http://localhost:3000/publicapi/verify");
    }

    #[test]
    fn invalid_notification_fails_before_any_network_call() {
        let mut n = notification();
        n.application = "x".repeat(257);
        // NoNetwork panics if notify ever reaches the transport.
        let err = client().notify(&n).unwrap_err();
        assert_eq!(err.notify_code(), -1);
    }

    #[test]
    fn out_of_range_priority_fails_before_any_network_call() {
        let err = client().notify(&notification().with_priority(3)).unwrap_err();
        assert_eq!(err.notify_code(), -4);
    }

    #[test]
    fn bad_key_in_list_fails_before_any_network_call() {
        let mut n = notification();
        n.api_key = format!("{},tooshort", key());
        let err = client().notify(&n).unwrap_err();
        assert_eq!(err.notify_code(), -5);
    }

    #[test]
    fn invalid_verification_fails_before_any_network_call() {
        let err = client().verify(&Verification::new("tooshort")).unwrap_err();
        assert_eq!(err, NmaError::InvalidApiKey);
        assert_eq!(err.verify_code(), -1);
    }

    #[test]
    fn parse_reply_success_envelope() {
        let reply = HttpResponse {
            status: 200,
            body: r#"<nma><success code="100"/></nma>"#.to_string(),
        };
        assert_eq!(client().parse_reply(reply), Ok(()));
    }

    #[test]
    fn parse_reply_error_envelope_carries_server_text() {
        let reply = HttpResponse {
            status: 200,
            body: r#"<nma><error code="401">Invalid apikey</error></nma>"#.to_string(),
        };
        let err = client().parse_reply(reply).unwrap_err();
        assert_eq!(err, NmaError::Api("Invalid apikey".to_string()));
        assert_eq!(err.notify_code(), -9);
    }

    #[test]
    fn parse_reply_non_200_skips_the_body_entirely() {
        let reply = HttpResponse {
            status: 500,
            body: "<not even xml".to_string(),
        };
        let err = client().parse_reply(reply).unwrap_err();
        assert_eq!(err, NmaError::ServerStatus(500));
        assert_eq!(err.notify_code(), -8);
        assert_eq!(err.verify_code(), -8);
        assert!(err.to_string().contains("contacting NMA Servers"));
    }

    #[test]
    fn parse_reply_strips_newlines_before_parsing() {
        let reply = HttpResponse {
            status: 200,
            body: "<nma>\r\n  <error code=\"402\">Daily limit\nexceeded</error>\r\n</nma>\n"
                .to_string(),
        };
        let err = client().parse_reply(reply).unwrap_err();
        // Line joining is concatenation, as upstream read it line by line.
        assert_eq!(err, NmaError::Api("Daily limitexceeded".to_string()));
    }
}
