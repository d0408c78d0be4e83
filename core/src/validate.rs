//! Local field validation, run before any network I/O.
//!
//! # Design
//! The server validates everything again, but there is no point submitting a
//! request we already know is wrong. Rules are checked in a fixed order and
//! the first violation wins, so a request with several bad fields reports
//! the same error the upstream library would have.
//!
//! Lengths are counted in characters, not bytes. Key checks are length-only;
//! the 48 characters are hex in practice but the charset is not enforced
//! here (nor was it upstream).

use crate::error::NmaError;
use crate::types::{Notification, Verification};

/// Required length of an API key or developer key.
pub const KEY_LEN: usize = 48;

/// Inclusive upper bounds on notification field lengths.
pub const MAX_APPLICATION_LEN: usize = 256;
pub const MAX_EVENT_LEN: usize = 1000;
pub const MAX_DESCRIPTION_LEN: usize = 10000;

/// Check every `notify` field, first violation wins.
pub fn validate_notification(n: &Notification) -> Result<(), NmaError> {
    if !len_in(&n.application, 1, MAX_APPLICATION_LEN) {
        return Err(NmaError::InvalidApplication);
    }
    if !len_in(&n.event, 1, MAX_EVENT_LEN) {
        return Err(NmaError::InvalidEvent);
    }
    if !len_in(&n.description, 1, MAX_DESCRIPTION_LEN) {
        return Err(NmaError::InvalidDescription);
    }
    if n.priority < -2 || n.priority > 2 {
        return Err(NmaError::InvalidPriority);
    }
    if !n.api_key.split(',').all(|key| char_len(key) == KEY_LEN) {
        return Err(NmaError::InvalidApiKey);
    }
    validate_developer_key(n.developer_key.as_deref())
}

/// Check the `verify` fields: one key (no list splitting) and the optional
/// developer key.
pub fn validate_verification(v: &Verification) -> Result<(), NmaError> {
    if char_len(&v.api_key) != KEY_LEN {
        return Err(NmaError::InvalidApiKey);
    }
    validate_developer_key(v.developer_key.as_deref())
}

fn validate_developer_key(key: Option<&str>) -> Result<(), NmaError> {
    match key {
        Some(k) if char_len(k) != KEY_LEN => Err(NmaError::InvalidDeveloperKey),
        _ => Ok(()),
    }
}

fn len_in(s: &str, min: usize, max: usize) -> bool {
    let len = char_len(s);
    len >= min && len <= max
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
