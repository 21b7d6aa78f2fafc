// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Listing parameter validation and next-page links.
//!
//! Query values arrive as untyped text. They are turned into a
//! [`BillOrder`] and [`BillFilters`] here, before anything reaches the
//! planner, and turned back into text when the next page link is built.

use billwatch_domain::{BillFilters, BillOrder, date_from_unix_timestamp};
use num_traits::ToPrimitive;
use std::str::FromStr;
use url::form_urlencoded;

use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{ListBillsQuery, ListPendingQuery};

/// Path of the finalized bill listing.
pub const BILLS_PATH: &str = "/bills";
/// Path of the pending bill listing.
pub const PENDING_PATH: &str = "/bills/pending";
/// Path that triggers the update task.
pub const UPDATE_PATH: &str = "/update";

/// A validated finalized-bill listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub order: BillOrder,
    pub filters: BillFilters,
    before: Option<i64>,
    after: Option<i64>,
}

impl ListRequest {
    /// Builds the link to the page starting at `next_offset`.
    ///
    /// Every active parameter is carried over unchanged, in the order
    /// `order`, `before`, `after`, `committee`, followed by `start`.
    #[must_use]
    pub fn next_link(&self, next_offset: u64) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("order", &self.order.to_string());
        if let Some(before) = self.before {
            serializer.append_pair("before", &before.to_string());
        }
        if let Some(after) = self.after {
            serializer.append_pair("after", &after.to_string());
        }
        if let Some(committee) = &self.filters.committee {
            serializer.append_pair("committee", committee);
        }
        serializer.append_pair("start", &next_offset.to_string());

        format!("{BILLS_PATH}?{}", serializer.finish())
    }
}

/// Builds the link to the pending page starting at `next_offset`.
#[must_use]
pub fn pending_next_link(next_offset: u64) -> String {
    format!("{PENDING_PATH}?start={next_offset}")
}

/// Validates the parameters of a finalized-bill listing.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if `order` is missing or malformed, or
/// if `start`, `before` or `after` are not integers.
pub fn parse_list_query(query: &ListBillsQuery) -> Result<ListRequest, ApiError> {
    let Some(raw_order) = query.order.as_deref() else {
        return Err(ApiError::InvalidInput {
            field: String::from("order"),
            message: String::from("order parameter is required"),
        });
    };
    let order: BillOrder = BillOrder::from_str(raw_order).map_err(translate_domain_error)?;

    let start: u64 = parse_offset(query.start.as_deref())?;
    let before: Option<i64> = parse_unix_timestamp("before", query.before.as_deref())?;
    let after: Option<i64> = parse_unix_timestamp("after", query.after.as_deref())?;

    let filters = BillFilters {
        before: before.map(|t| to_date("before", t)).transpose()?,
        after: after.map(|t| to_date("after", t)).transpose()?,
        committee: query.committee.clone(),
        start,
    };

    Ok(ListRequest {
        order,
        filters,
        before,
        after,
    })
}

/// Validates the parameters of a pending listing and returns the offset.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if `start` is not a non-negative integer.
pub fn parse_pending_query(query: &ListPendingQuery) -> Result<u64, ApiError> {
    parse_offset(query.start.as_deref())
}

/// Parses `start`. Absent means zero.
///
/// Offsets are capped at `i64::MAX` since that is what SQL accepts.
fn parse_offset(raw: Option<&str>) -> Result<u64, ApiError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let invalid = || ApiError::InvalidInput {
        field: String::from("start"),
        message: format!("Starting row must be a non-negative integer, got '{raw}'"),
    };

    let parsed: i64 = raw.trim().parse().map_err(|_| invalid())?;
    parsed.to_u64().ok_or_else(invalid)
}

fn parse_unix_timestamp(field: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("{field} must be a Unix timestamp, got '{raw}'"),
        })
}

fn to_date(field: &str, timestamp: i64) -> Result<time::Date, ApiError> {
    date_from_unix_timestamp(timestamp).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}
