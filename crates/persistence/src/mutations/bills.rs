// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use billwatch_domain::{FinalizedBill, PendingBill};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewBill, NewFinance, NewPendingBill, PendingInsert};
use crate::diesel_schema::{bills, finances, pending_bills};
use crate::error::PersistenceError;

backend_fn! {
/// Persists a finalized bill with its finances and removes its pending twin.
///
/// A bill that already carries an id is returned as-is with no writes.
/// Otherwise, in one transaction: the bill row is inserted, each finance
/// row is inserted under the new id, and any pending bill with the same
/// `cbo_url` is deleted. The new id is stored on `bill`.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if a finalized bill with the
/// same `cbo_url` exists, `PersistenceError::InvalidParameter` if the
/// finance amounts overflow the bill total, or another error if any write
/// fails. Nothing is written on error.
pub fn finalize_bill(
    conn: &mut _,
    bill: &mut FinalizedBill,
) -> Result<i64, PersistenceError> {
    if let Some(bill_id) = bill.id() {
        debug!(bill_id, "Bill already finalized, nothing to write");
        return Ok(bill_id);
    }

    let net: i64 = bill
        .net_amount()
        .map_err(|e| PersistenceError::InvalidParameter {
            parameter: "finances",
            message: e.to_string(),
        })?;

    let finalized: &FinalizedBill = bill;
    let (bill_id, removed_pending) = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(bills::table)
            .values(NewBill::from_details(finalized.details())?)
            .execute(conn)?;
        let bill_id: i64 = conn.get_last_insert_rowid()?;

        for finance in finalized.finances() {
            diesel::insert_into(finances::table)
                .values(NewFinance {
                    bill_id,
                    timespan: finance.timespan(),
                    amount: finance.amount(),
                })
                .execute(conn)?;
        }

        let removed_pending: usize = diesel::delete(
            pending_bills::table.filter(pending_bills::cbo_url.eq(finalized.details().cbo_url())),
        )
        .execute(conn)?;

        Ok((bill_id, removed_pending))
    })?;

    info!(
        bill_id,
        finances = bill.finances().len(),
        net,
        removed_pending,
        "Finalized bill"
    );
    bill.mark_persisted(bill_id);
    Ok(bill_id)
}
}

backend_fn! {
/// Queues a bill for review unless its `cbo_url` is already known.
///
/// A `cbo_url` counts as known if it is present in either the pending or
/// the finalized collection. On insert the new id is stored on `bill`.
/// A bill that already carries an id is reported as already known.
///
/// # Errors
///
/// Returns an error if the lookup or the insert fails.
pub fn insert_pending_bill(
    conn: &mut _,
    bill: &mut PendingBill,
) -> Result<PendingInsert, PersistenceError> {
    if bill.id().is_some() {
        return Ok(PendingInsert::AlreadyKnown);
    }

    let pending: &PendingBill = bill;
    let result = conn.transaction::<_, PersistenceError, _>(|conn| {
        let cbo_url: &str = pending.details().cbo_url();

        let finalized_count: i64 = bills::table
            .filter(bills::cbo_url.eq(cbo_url))
            .count()
            .get_result(conn)?;
        let pending_count: i64 = pending_bills::table
            .filter(pending_bills::cbo_url.eq(cbo_url))
            .count()
            .get_result(conn)?;
        if finalized_count > 0 || pending_count > 0 {
            return Ok(PendingInsert::AlreadyKnown);
        }

        diesel::insert_into(pending_bills::table)
            .values(NewPendingBill::from_details(pending.details())?)
            .execute(conn)?;
        Ok(PendingInsert::Inserted(conn.get_last_insert_rowid()?))
    })?;

    match result {
        PendingInsert::Inserted(pending_id) => {
            debug!(pending_id, cbo_url = bill.details().cbo_url(), "Queued pending bill");
            bill.mark_persisted(pending_id);
        }
        PendingInsert::AlreadyKnown => {
            debug!(cbo_url = bill.details().cbo_url(), "Skipping known bill");
        }
    }
    Ok(result)
}
}
