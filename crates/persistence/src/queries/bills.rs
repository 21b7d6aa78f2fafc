// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use billwatch_domain::{Bill, BillCollection};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{BillRow, FinanceRow, PendingBillRow};
use crate::diesel_schema::{bills, finances, pending_bills};
use crate::error::PersistenceError;

backend_fn! {
/// Loads one bill by id from the given collection.
///
/// Finalized bills come back with all of their finance rows. A missing id
/// is `Ok(None)`, not an error.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row no longer passes
/// domain validation.
pub fn load_bill(
    conn: &mut _,
    id: i64,
    collection: BillCollection,
) -> Result<Option<Bill>, PersistenceError> {
    match collection {
        BillCollection::Finalized => {
            let row: Option<BillRow> = bills::table
                .find(id)
                .select(BillRow::as_select())
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                debug!(id, %collection, "Bill not found");
                return Ok(None);
            };

            let finance_rows: Vec<FinanceRow> = finances::table
                .filter(finances::bill_id.eq(id))
                .order_by(finances::finance_id.asc())
                .select(FinanceRow::as_select())
                .load(conn)?;

            Ok(Some(Bill::Finalized(row.into_domain(finance_rows)?)))
        }
        BillCollection::Pending => {
            let row: Option<PendingBillRow> = pending_bills::table
                .find(id)
                .select(PendingBillRow::as_select())
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                debug!(id, %collection, "Bill not found");
                return Ok(None);
            };

            Ok(Some(Bill::Pending(row.into_domain()?)))
        }
    }
}
}

backend_fn! {
/// Counts finalized bills.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_bills(conn: &mut _) -> Result<i64, PersistenceError> {
    Ok(bills::table.count().get_result(conn)?)
}
}

backend_fn! {
/// Counts pending bills.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_pending_bills(conn: &mut _) -> Result<i64, PersistenceError> {
    Ok(pending_bills::table.count().get_result(conn)?)
}
}
