//! Field-level validation accumulator.
//!
//! A [`Validator`] collects at most one human-readable message per field key.
//! The first failing check for a key wins; later failures on the same key are
//! ignored so the caller always sees the most fundamental problem first
//! (e.g. "must be provided" before "must not be more than 500 bytes long").

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

/// Field key -> error message. Sorted by key for deterministic output.
pub type FieldErrors = BTreeMap<String, String>;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Loose RFC 5322 address check for structured email fields.
pub static EMAIL_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Accumulates validation failures for a single request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no check has failed.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` under `key` unless the key already has an entry.
    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(key.into())
            .or_insert_with(|| message.into());
    }

    /// Record `message` under `key` when `ok` is false.
    pub fn check(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_error(key, message);
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Convert into `Ok(())` when valid, otherwise [`CoreError::Validation`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.valid() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

/// Membership test against a fixed list of permitted values.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

/// `true` when `values` contains no duplicate elements.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v))
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
