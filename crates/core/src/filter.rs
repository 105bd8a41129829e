//! Pagination and sorting for list endpoints.
//!
//! A [`Filter`] is built from caller input, checked with [`validate_filter`],
//! and only then handed to a repository. The ORDER BY column is never taken
//! from the caller: [`Filter::sort_column`] resolves the requested token
//! against a closed [`SortKey`] table and returns the table's literal.

use serde::Serialize;

use crate::validator::Validator;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Highest page number a caller may request.
pub const MAX_PAGE: i64 = 10_000_000;

/// Maximum number of records per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// One entry of a resource's sort safelist: the public token a caller may
/// send, and the column identifier it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub token: &'static str,
    pub column: &'static str,
}

impl SortKey {
    pub const fn new(token: &'static str, column: &'static str) -> Self {
        Self { token, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Filter {
    pub page: i64,
    pub page_size: i64,
    /// Sort token, optionally prefixed with `-` for descending order.
    pub sort: String,
    pub sort_safelist: &'static [SortKey],
}

impl Filter {
    /// The sort token with any leading `-` removed.
    fn sort_token(&self) -> &str {
        self.sort.strip_prefix('-').unwrap_or(&self.sort)
    }

    /// Resolve the sort token to its safelisted column literal.
    ///
    /// Returns `None` when the token is not in the safelist.
    pub fn sort_column(&self) -> Option<&'static str> {
        let token = self.sort_token();
        self.sort_safelist
            .iter()
            .find(|key| key.token == token)
            .map(|key| key.column)
    }

    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with('-') {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Check page bounds and sort membership. Keys: `page`, `page_size`, `sort`.
pub fn validate_filter(v: &mut Validator, filter: &Filter) {
    v.check(filter.page > 0, "page", "must be greater than zero");
    v.check(
        filter.page <= MAX_PAGE,
        "page",
        "must be a maximum of 10 million",
    );
    v.check(filter.page_size > 0, "page_size", "must be greater than zero");
    v.check(
        filter.page_size <= MAX_PAGE_SIZE,
        "page_size",
        "must be a maximum of 100",
    );
    v.check(
        filter.sort_column().is_some(),
        "sort",
        "invalid sort value",
    );
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Descriptive fields about a returned page. Informational only: the rows
/// returned by the store are authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

/// Derive page metadata from the total matching row count.
///
/// All fields are zero when `total_records` is zero.
pub fn calculate_metadata(total_records: i64, page: i64, page_size: i64) -> Metadata {
    if total_records <= 0 || page_size <= 0 {
        return Metadata::default();
    }

    Metadata {
        current_page: page,
        page_size,
        first_page: 1,
        last_page: (total_records + page_size - 1) / page_size,
        total_records,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
