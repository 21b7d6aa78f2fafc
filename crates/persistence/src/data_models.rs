// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use billwatch_domain::{
    BillDetails, FinalizedBill, Finance, PendingBill, format_date, parse_date, parse_timestamp,
};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{bills, finances, pending_bills, update_runs};
use crate::error::PersistenceError;

/// Result of offering a bill to the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingInsert {
    /// The bill was queued under this id.
    Inserted(i64),
    /// A bill with the same `cbo_url` is already pending or finalized.
    AlreadyKnown,
}

/// One recorded execution of the update task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRunData {
    pub run_id: i64,
    pub started_at: OffsetDateTime,
    pub finished_at: Option<OffsetDateTime>,
    pub succeeded: bool,
    pub imported_count: usize,
    pub error_message: Option<String>,
}

/// Diesel Queryable struct for finalized bill rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bills)]
pub struct BillRow {
    pub bill_id: i64,
    pub title: String,
    pub code: String,
    pub summary: String,
    pub committee: String,
    pub published: String,
    pub cbo_url: String,
    pub pdf_url: String,
}

/// Diesel Queryable struct for pending bill rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = pending_bills)]
pub struct PendingBillRow {
    pub pending_id: i64,
    pub title: String,
    pub code: String,
    pub summary: String,
    pub committee: String,
    pub published: String,
    pub cbo_url: String,
    pub pdf_url: String,
}

/// Diesel Queryable struct for finance rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = finances)]
pub struct FinanceRow {
    pub timespan: i32,
    pub amount: i64,
}

/// Diesel Queryable struct for update run rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = update_runs)]
pub struct UpdateRunRow {
    pub run_id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub succeeded: i32,
    pub imported_count: i32,
    pub error_message: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = bills)]
pub struct NewBill<'a> {
    pub title: &'a str,
    pub code: &'a str,
    pub summary: &'a str,
    pub committee: &'a str,
    pub published: String,
    pub cbo_url: &'a str,
    pub pdf_url: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = pending_bills)]
pub struct NewPendingBill<'a> {
    pub title: &'a str,
    pub code: &'a str,
    pub summary: &'a str,
    pub committee: &'a str,
    pub published: String,
    pub cbo_url: &'a str,
    pub pdf_url: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = finances)]
pub struct NewFinance {
    pub bill_id: i64,
    pub timespan: i32,
    pub amount: i64,
}

fn stored_date(date: Date) -> Result<String, PersistenceError> {
    format_date(date).map_err(|e| PersistenceError::InvalidParameter {
        parameter: "published",
        message: e.to_string(),
    })
}

impl<'a> NewBill<'a> {
    /// Borrows the insertable columns from validated details.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidParameter` if the published date
    /// cannot be formatted for storage.
    pub fn from_details(details: &'a BillDetails) -> Result<Self, PersistenceError> {
        Ok(Self {
            title: details.title(),
            code: details.code(),
            summary: details.summary(),
            committee: details.committee(),
            published: stored_date(details.published())?,
            cbo_url: details.cbo_url(),
            pdf_url: details.pdf_url(),
        })
    }
}

impl<'a> NewPendingBill<'a> {
    /// Borrows the insertable columns from validated details.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidParameter` if the published date
    /// cannot be formatted for storage.
    pub fn from_details(details: &'a BillDetails) -> Result<Self, PersistenceError> {
        Ok(Self {
            title: details.title(),
            code: details.code(),
            summary: details.summary(),
            committee: details.committee(),
            published: stored_date(details.published())?,
            cbo_url: details.cbo_url(),
            pdf_url: details.pdf_url(),
        })
    }
}

impl BillRow {
    /// Rebuilds the finalized bill from its row and finance rows.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` if any stored value
    /// fails domain validation.
    pub fn into_domain(
        self,
        finance_rows: Vec<FinanceRow>,
    ) -> Result<FinalizedBill, PersistenceError> {
        let details = BillDetails::new(
            self.title,
            self.code,
            self.summary,
            self.committee,
            parse_date(&self.published)?,
            self.cbo_url,
            self.pdf_url,
        )?;
        let finances = finance_rows
            .into_iter()
            .map(|row| Finance::new(row.timespan, row.amount))
            .collect::<Result<Vec<Finance>, _>>()?;

        Ok(FinalizedBill::with_id(self.bill_id, details, finances))
    }
}

impl PendingBillRow {
    /// Rebuilds the pending bill from its row.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` if any stored value
    /// fails domain validation.
    pub fn into_domain(self) -> Result<PendingBill, PersistenceError> {
        let details = BillDetails::new(
            self.title,
            self.code,
            self.summary,
            self.committee,
            parse_date(&self.published)?,
            self.cbo_url,
            self.pdf_url,
        )?;
        Ok(PendingBill::with_id(self.pending_id, details))
    }
}

impl UpdateRunRow {
    /// Converts the stored run into its public form.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` if a timestamp or the
    /// imported count cannot be interpreted.
    pub fn into_data(self) -> Result<UpdateRunData, PersistenceError> {
        let imported_count: usize = self.imported_count.to_usize().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "negative imported_count {} on update run {}",
                self.imported_count, self.run_id
            ))
        })?;

        Ok(UpdateRunData {
            run_id: self.run_id,
            started_at: parse_timestamp(&self.started_at)?,
            finished_at: self
                .finished_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            succeeded: self.succeeded != 0,
            imported_count,
            error_message: self.error_message,
        })
    }
}
