//! Request types for the two NMA operations.
//!
//! # Design
//! Both types are plain data, built once and then treated as immutable.
//! Constructors cover the common case (priority 0, no developer key) and
//! `with_*` methods fill in the optional fields. Validation is deliberately
//! not done at construction time — `NmaClient` validates on use, so a
//! request that was built with bad fields fails with a specific error code
//! instead of panicking at the call site that created it.

/// A notification to deliver through `/publicapi/notify`.
///
/// `api_key` is either a single 48-character key or a comma-separated list
/// of them; the server delivers to every valid key in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub application: String,
    pub event: String,
    pub description: String,
    /// Severity from -2 (very low) to 2 (emergency). Defaults to 0.
    pub priority: i32,
    pub api_key: String,
    pub developer_key: Option<String>,
}

impl Notification {
    pub fn new(application: &str, event: &str, description: &str, api_key: &str) -> Self {
        Self {
            application: application.to_string(),
            event: event.to_string(),
            description: description.to_string(),
            priority: 0,
            api_key: api_key.to_string(),
            developer_key: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_developer_key(mut self, developer_key: &str) -> Self {
        self.developer_key = Some(developer_key.to_string());
        self
    }
}

/// A key check for `/publicapi/verify`. Takes exactly one API key — the
/// verify endpoint does not accept comma-separated lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub api_key: String,
    pub developer_key: Option<String>,
}

impl Verification {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            developer_key: None,
        }
    }

    pub fn with_developer_key(mut self, developer_key: &str) -> Self {
        self.developer_key = Some(developer_key.to_string());
        self
    }
}
