//! In-process emulation of the NMA public API.
//!
//! Speaks the real wire protocol: form-urlencoded POST bodies on
//! `/publicapi/notify` and `/publicapi/verify`, XML envelope replies with
//! HTTP 200 for both success and application-level errors. Integration
//! tests point `nma-core` at this server to exercise the full round trip,
//! and `force_status` lets them simulate a broken backend that answers
//! with a bare non-200 status.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, RwLock,
    },
};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;

const KEY_LEN: usize = 48;

/// Per-key daily call allowance reported in the `remaining` attribute.
const DAILY_LIMIT: u32 = 800;

/// Shared state of the emulated service: the set of registered API keys,
/// an optional forced HTTP status, and the remaining-call counter.
#[derive(Clone)]
pub struct MockApi {
    keys: Arc<RwLock<HashSet<String>>>,
    force_status: Arc<RwLock<Option<u16>>>,
    remaining: Arc<AtomicU32>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct NotifyForm {
    apikey: String,
    application: String,
    event: String,
    description: String,
    priority: i32,
    developerkey: Option<String>,
}

#[derive(Deserialize)]
struct VerifyForm {
    apikey: String,
    developerkey: Option<String>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            keys: Arc::new(RwLock::new(HashSet::new())),
            force_status: Arc::new(RwLock::new(None)),
            remaining: Arc::new(AtomicU32::new(DAILY_LIMIT)),
        }
    }

    /// Register an API key so notify/verify calls against it succeed.
    pub fn register_key(&self, key: &str) {
        self.keys.write().unwrap().insert(key.to_string());
    }

    /// Make every route reply with this bare status instead of an XML
    /// envelope. `None` restores normal behavior.
    pub fn force_status(&self, status: Option<u16>) {
        *self.force_status.write().unwrap() = status;
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/publicapi/notify", post(notify))
            .route("/publicapi/verify", post(verify))
            .with_state(self.clone())
    }

    fn forced(&self) -> Option<StatusCode> {
        let status = (*self.force_status.read().unwrap())?;
        StatusCode::from_u16(status).ok()
    }

    fn is_registered(&self, key: &str) -> bool {
        self.keys.read().unwrap().contains(key)
    }
}

pub async fn run(listener: TcpListener, api: MockApi) -> Result<(), std::io::Error> {
    axum::serve(listener, api.router()).await
}

async fn notify(State(api): State<MockApi>, Form(form): Form<NotifyForm>) -> Response {
    if let Some(status) = api.forced() {
        return status.into_response();
    }

    if form.application.is_empty() || form.application.chars().count() > 256 {
        return error_xml(400, "application length is invalid");
    }
    if form.event.is_empty() || form.event.chars().count() > 1000 {
        return error_xml(400, "event length is invalid");
    }
    if form.description.is_empty() || form.description.chars().count() > 10000 {
        return error_xml(400, "description length is invalid");
    }
    if form.priority < -2 || form.priority > 2 {
        return error_xml(400, "priority is out of range");
    }
    if let Err(resp) = check_developer_key(form.developerkey.as_deref()) {
        return resp;
    }
    if form.apikey.split(',').any(|key| key.chars().count() != KEY_LEN) {
        return error_xml(400, "apikey format is invalid");
    }

    // The real service delivers to the valid subset of a key list, so one
    // registered key is enough for a success reply.
    if !form.apikey.split(',').any(|key| api.is_registered(key)) {
        return error_xml(401, "None of the API keys provided were valid");
    }

    let remaining = api.remaining.fetch_sub(1, Ordering::Relaxed).saturating_sub(1);
    success_xml(remaining)
}

async fn verify(State(api): State<MockApi>, Form(form): Form<VerifyForm>) -> Response {
    if let Some(status) = api.forced() {
        return status.into_response();
    }

    // verify takes exactly one key; a comma-separated list fails the
    // length check like any other malformed key.
    if form.apikey.chars().count() != KEY_LEN {
        return error_xml(400, "apikey format is invalid");
    }
    if let Err(resp) = check_developer_key(form.developerkey.as_deref()) {
        return resp;
    }
    if !api.is_registered(&form.apikey) {
        return error_xml(401, "apikey is not valid");
    }

    success_xml(api.remaining.load(Ordering::Relaxed))
}

fn check_developer_key(key: Option<&str>) -> Result<(), Response> {
    match key {
        Some(k) if k.chars().count() != KEY_LEN => {
            Err(error_xml(400, "developerkey format is invalid"))
        }
        _ => Ok(()),
    }
}

fn success_xml(remaining: u32) -> Response {
    xml_body(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><nma><success code="200" remaining="{remaining}" resettimer="59" /></nma>"#
    ))
}

fn error_xml(code: u16, message: &str) -> Response {
    xml_body(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><nma><error code="{code}">{}</error></nma>"#,
        xml_escape(message)
    ))
}

fn xml_body(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        body,
    )
        .into_response()
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
