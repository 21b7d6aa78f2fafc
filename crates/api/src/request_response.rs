// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use billwatch_domain::{Bill, BillInput, FinanceInput, format_date};
use billwatch_persistence::UpdateRunData;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ApiError;

/// Raw query parameters of a bill listing request.
///
/// Everything arrives as text; `crate::query` does the validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListBillsQuery {
    /// `<key> <direction>`, e.g. `date desc`. Required.
    pub order: Option<String>,
    /// Row offset into the ordered result.
    pub start: Option<String>,
    /// Unix timestamp; only bills published on or before its UTC date.
    pub before: Option<String>,
    /// Unix timestamp; only bills published on or after its UTC date.
    pub after: Option<String>,
    /// Exact committee name.
    pub committee: Option<String>,
}

/// Raw query parameters of a pending listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPendingQuery {
    /// Row offset into the pending queue.
    pub start: Option<String>,
}

/// API request to finalize a bill.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitBillRequest {
    pub title: String,
    pub code: String,
    pub summary: String,
    pub committee: String,
    /// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339.
    pub published: String,
    pub cbo_url: String,
    pub pdf_url: String,
    /// Cost projections. Required, may be empty.
    pub finances: Vec<FinanceInput>,
}

impl SubmitBillRequest {
    /// Splits the request into the bill payload and its finance entries.
    #[must_use]
    pub fn into_parts(self) -> (BillInput, Vec<FinanceInput>) {
        (
            BillInput {
                title: self.title,
                code: self.code,
                summary: self.summary,
                committee: self.committee,
                published: self.published,
                cbo_url: self.cbo_url,
                pdf_url: self.pdf_url,
            },
            self.finances,
        )
    }
}

/// One finance entry as shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FinanceInfo {
    /// Projection span in years.
    pub timespan: i32,
    /// Whole currency units; negative values are savings.
    pub amount: i64,
}

/// Bill information for listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BillInfo {
    /// The bill's identifier within its collection.
    pub id: i64,
    pub title: String,
    pub code: String,
    pub summary: String,
    pub committee: String,
    /// `YYYY-MM-DD`.
    pub published: String,
    pub cbo_url: String,
    pub pdf_url: String,
    /// Present for finalized bills only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finances: Option<Vec<FinanceInfo>>,
}

impl BillInfo {
    /// Builds the client view of a persisted bill.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the bill has no id yet or its
    /// published date cannot be formatted.
    pub fn from_bill(bill: &Bill) -> Result<Self, ApiError> {
        let id: i64 = bill.id().ok_or_else(|| ApiError::Internal {
            message: String::from("Bill has not been persisted"),
        })?;
        let details = bill.details();
        Ok(Self {
            id,
            title: details.title().to_string(),
            code: details.code().to_string(),
            summary: details.summary().to_string(),
            committee: details.committee().to_string(),
            published: format_date(details.published()).map_err(|e| ApiError::Internal {
                message: e.to_string(),
            })?,
            cbo_url: details.cbo_url().to_string(),
            pdf_url: details.pdf_url().to_string(),
            finances: bill.finances().map(|finances| {
                finances
                    .iter()
                    .map(|f| FinanceInfo {
                        timespan: f.timespan(),
                        amount: f.amount(),
                    })
                    .collect()
            }),
        })
    }
}

/// API response for listing finalized bills.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListBillsResponse {
    pub bills: Vec<BillInfo>,
    /// Relative link to the next page, or `None` on the last page.
    pub next: Option<String>,
    /// Link that triggers the update task, or `None` when data is fresh.
    pub update: Option<String>,
}

/// API response for listing pending bills.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPendingResponse {
    pub bills: Vec<BillInfo>,
    /// Relative link to the next page, or `None` on the last page.
    pub next: Option<String>,
}

/// API response for a successful bill submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitBillResponse {
    /// The persisted bill id.
    pub id: i64,
    /// A success message.
    pub message: String,
}

/// API response for an update trigger.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TriggerUpdateResponse {
    /// `completed`, `already_running` or `not_needed`.
    pub outcome: String,
    /// A human-readable summary.
    pub message: String,
}

/// One recorded update run as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateRunInfo {
    pub run_id: i64,
    /// RFC 3339, UTC.
    pub started_at: String,
    /// RFC 3339, UTC. `None` while the run is in progress or was abandoned.
    pub finished_at: Option<String>,
    pub succeeded: bool,
    pub imported_count: usize,
    pub error_message: Option<String>,
}

fn rfc3339(instant: OffsetDateTime) -> Result<String, ApiError> {
    instant.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Timestamp formatting failed: {e}"),
    })
}

impl UpdateRunInfo {
    /// Builds the client view of a stored update run.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if a timestamp cannot be formatted.
    pub fn from_data(run: UpdateRunData) -> Result<Self, ApiError> {
        Ok(Self {
            run_id: run.run_id,
            started_at: rfc3339(run.started_at)?,
            finished_at: run.finished_at.map(rfc3339).transpose()?,
            succeeded: run.succeeded,
            imported_count: run.imported_count,
            error_message: run.error_message,
        })
    }
}

/// API response describing the update task's state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateStatusResponse {
    /// Whether a trigger would run the refresh now.
    pub due: bool,
    /// Number of finalized bills.
    pub bills: usize,
    /// Number of bills awaiting review.
    pub pending: usize,
    /// Most recent runs, newest first.
    pub runs: Vec<UpdateRunInfo>,
}
