// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for listings, submissions and updates.

use billwatch::{PageSize, UpdateCoordinator, UpdateLock, UpdateOutcome, paginate};
use billwatch_domain::{
    Bill, BillCollection, FinalizedBill, Finance, validate_bill_input, validate_finances,
};
use billwatch_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::{
    ApiError, translate_domain_error, translate_persistence_error, translate_update_error,
};
use crate::query::{ListRequest, UPDATE_PATH, parse_list_query, parse_pending_query, pending_next_link};
use crate::request_response::{
    BillInfo, ListBillsQuery, ListBillsResponse, ListPendingQuery, ListPendingResponse,
    SubmitBillRequest, SubmitBillResponse, TriggerUpdateResponse, UpdateRunInfo,
    UpdateStatusResponse,
};
use crate::update_task::{FeedRefresh, StalenessPolicy, should_run_update};

/// Loads each id and converts it for the response.
///
/// A row deleted between selection and load is skipped with a warning; the
/// page is then short by one but the next link stays correct.
fn hydrate(
    persistence: &mut Persistence,
    ids: &[i64],
    collection: BillCollection,
) -> Result<Vec<BillInfo>, ApiError> {
    let mut bills: Vec<BillInfo> = Vec::with_capacity(ids.len());
    for &id in ids {
        let loaded: Option<Bill> = persistence
            .load_bill(id, collection)
            .map_err(translate_persistence_error)?;
        match loaded {
            Some(bill) => bills.push(BillInfo::from_bill(&bill)?),
            None => warn!(bill_id = id, %collection, "Selected bill vanished before load, skipping"),
        }
    }
    Ok(bills)
}

/// Lists one page of finalized bills.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `query` - The raw listing parameters
/// * `page_size` - Maximum number of bills on the page
/// * `policy` - Decides whether the `update` link is offered
/// * `now` - The current time, for the staleness check
///
/// # Errors
///
/// Returns an error if:
/// - The listing parameters are missing or malformed
/// - A database query fails
pub fn list_bills(
    persistence: &mut Persistence,
    query: &ListBillsQuery,
    page_size: PageSize,
    policy: &StalenessPolicy,
    now: OffsetDateTime,
) -> Result<ListBillsResponse, ApiError> {
    let request: ListRequest = parse_list_query(query)?;
    debug!(
        order = %request.order,
        start = request.filters.start,
        filtered = request.filters.has_predicates(),
        "Listing bills"
    );

    let ids: Vec<i64> = persistence
        .select_bill_ids(request.order, &request.filters, page_size.fetch_size())
        .map_err(translate_persistence_error)?;
    let page = paginate(ids, page_size);
    let next: Option<String> = page
        .next_offset(request.filters.start)
        .map(|offset| request.next_link(offset));

    let bills: Vec<BillInfo> = hydrate(persistence, page.items(), BillCollection::Finalized)?;

    let update: Option<String> = should_run_update(persistence, policy, now)
        .map_err(translate_persistence_error)?
        .then(|| String::from(UPDATE_PATH));

    debug!(returned = bills.len(), next = ?next, "Listed bills");
    Ok(ListBillsResponse {
        bills,
        next,
        update,
    })
}

/// Lists one page of the pending queue, oldest first.
///
/// # Errors
///
/// Returns an error if `start` is malformed or a database query fails.
pub fn list_pending(
    persistence: &mut Persistence,
    query: &ListPendingQuery,
    page_size: PageSize,
) -> Result<ListPendingResponse, ApiError> {
    let start: u64 = parse_pending_query(query)?;
    debug!(start, "Listing pending bills");

    let ids: Vec<i64> = persistence
        .select_pending_bill_ids(start, page_size.fetch_size())
        .map_err(translate_persistence_error)?;
    let page = paginate(ids, page_size);
    let next: Option<String> = page.next_offset(start).map(pending_next_link);

    let bills: Vec<BillInfo> = hydrate(persistence, page.items(), BillCollection::Pending)?;

    Ok(ListPendingResponse { bills, next })
}

/// Validates a submitted bill and finalizes it.
///
/// Any pending bill with the same `cbo_url` is removed in the same
/// transaction.
///
/// # Errors
///
/// Returns an error if:
/// - Any field is empty, the date is unparseable or a finance is invalid
/// - A finalized bill with the same `cbo_url` already exists
/// - The database write fails
pub fn submit_bill(
    persistence: &mut Persistence,
    request: SubmitBillRequest,
) -> Result<SubmitBillResponse, ApiError> {
    let (input, finance_inputs) = request.into_parts();
    let details = validate_bill_input(input).map_err(translate_domain_error)?;
    let finances: Vec<Finance> =
        validate_finances(&finance_inputs).map_err(translate_domain_error)?;

    let mut bill = FinalizedBill::new(details, finances);
    let net: i64 = bill.net_amount().map_err(translate_domain_error)?;
    let id: i64 = persistence
        .finalize_bill(&mut bill)
        .map_err(translate_persistence_error)?;

    info!(
        bill_id = id,
        code = bill.details().code(),
        net,
        "Bill finalized"
    );

    Ok(SubmitBillResponse {
        id,
        message: format!("Bill '{}' finalized", bill.details().code()),
    })
}

/// Number of update runs reported by [`update_status`].
pub const UPDATE_HISTORY_LIMIT: usize = 10;

/// Reports whether a refresh is due, the collection sizes and the most
/// recent update runs.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub fn update_status(
    persistence: &mut Persistence,
    policy: &StalenessPolicy,
    now: OffsetDateTime,
) -> Result<UpdateStatusResponse, ApiError> {
    let due: bool =
        should_run_update(persistence, policy, now).map_err(translate_persistence_error)?;
    let bills: usize = persistence.count_bills().map_err(translate_persistence_error)?;
    let pending: usize = persistence
        .count_pending_bills()
        .map_err(translate_persistence_error)?;
    let runs: Vec<UpdateRunInfo> = persistence
        .list_update_runs(UPDATE_HISTORY_LIMIT)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(UpdateRunInfo::from_data)
        .collect::<Result<_, _>>()?;

    debug!(due, bills, pending, runs = runs.len(), "Reporting update status");

    Ok(UpdateStatusResponse {
        due,
        bills,
        pending,
        runs,
    })
}

/// Runs the feed refresh unless another run holds the lock or data is
/// fresh.
///
/// Blocks for the whole run. Call from a blocking thread.
///
/// # Errors
///
/// Returns an error if the lock cannot be used or the refresh fails. The
/// lock is released and the failed run recorded before this returns.
pub fn trigger_update<L: UpdateLock>(
    coordinator: &UpdateCoordinator<L>,
    task: &mut FeedRefresh,
) -> Result<TriggerUpdateResponse, ApiError> {
    let outcome: UpdateOutcome = coordinator.try_run(task).map_err(translate_update_error)?;

    let message: String = match outcome {
        UpdateOutcome::Completed => {
            format!("Update completed, {} bill(s) queued for review", task.imported())
        }
        UpdateOutcome::AlreadyRunning => String::from("An update is already in progress"),
        UpdateOutcome::NotNeeded => String::from("Bill data is already up to date"),
    };

    Ok(TriggerUpdateResponse {
        outcome: outcome.to_string(),
        message,
    })
}
