//! HTTP exchange types, described as plain data.
//!
//! # Design
//! The NMA wire protocol only ever POSTs a form-urlencoded body and reads a
//! textual reply, so a request is just a URL plus an encoded body and a
//! response is just a status plus a body. `NmaClient` builds `HttpRequest`
//! values and interprets `HttpResponse` values; a `Transport` performs the
//! exchange in between. Owned fields keep the types free of lifetimes.

/// Content type sent with every request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A ready-to-send POST: target URL and form-urlencoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub body: String,
}

/// The reply to an `HttpRequest`, as observed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
