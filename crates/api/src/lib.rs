// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request layer for billwatch.
//!
//! Turns untyped request input into validated listing parameters, drives
//! the planner, pager and entity mapper, and runs the feed refresh under
//! the update coordinator. Transport-agnostic; the HTTP server is a thin
//! wrapper around these handlers.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod query;
mod request_response;
mod update_task;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_update_error,
};
pub use handlers::{
    UPDATE_HISTORY_LIMIT, list_bills, list_pending, submit_bill, trigger_update, update_status,
};
pub use query::{
    BILLS_PATH, ListRequest, PENDING_PATH, UPDATE_PATH, parse_list_query, parse_pending_query,
    pending_next_link,
};
pub use request_response::{
    BillInfo, FinanceInfo, ListBillsQuery, ListBillsResponse, ListPendingQuery,
    ListPendingResponse, SubmitBillRequest, SubmitBillResponse, TriggerUpdateResponse,
    UpdateRunInfo, UpdateStatusResponse,
};
pub use update_task::{
    DEFAULT_UPDATE_INTERVAL_HOURS, FeedRefresh, RefreshError, StalenessPolicy, load_feed,
    parse_feed_entries, should_run_update,
};
