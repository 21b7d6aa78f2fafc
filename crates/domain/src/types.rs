// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Date;

/// One projected cost line item of a bill.
///
/// `amount` is in whole currency units; negative amounts are savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finance {
    timespan: i32,
    amount: i64,
}

impl Finance {
    /// Creates a new finance line item.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFinanceTimespan` if the timespan is not a
    /// positive number of years.
    pub const fn new(timespan: i32, amount: i64) -> Result<Self, DomainError> {
        if timespan <= 0 {
            return Err(DomainError::InvalidFinanceTimespan(timespan));
        }
        Ok(Self { timespan, amount })
    }

    /// Returns the projection window in years.
    #[must_use]
    pub const fn timespan(&self) -> i32 {
        self.timespan
    }

    /// Returns the projected amount.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.amount
    }
}

/// Unvalidated bill payload as it arrives from a client or a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillInput {
    pub title: String,
    pub code: String,
    pub summary: String,
    pub committee: String,
    /// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339.
    pub published: String,
    pub cbo_url: String,
    pub pdf_url: String,
}

/// Unvalidated finance payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceInput {
    pub timespan: i32,
    pub amount: i64,
}

/// The validated descriptive attributes shared by pending and finalized bills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillDetails {
    title: String,
    code: String,
    summary: String,
    committee: String,
    published: Date,
    cbo_url: String,
    pdf_url: String,
}

impl BillDetails {
    /// Creates validated bill details.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyField` naming the first empty string field.
    pub fn new(
        title: String,
        code: String,
        summary: String,
        committee: String,
        published: Date,
        cbo_url: String,
        pdf_url: String,
    ) -> Result<Self, DomainError> {
        crate::validation::validate_required_field("title", &title)?;
        crate::validation::validate_required_field("code", &code)?;
        crate::validation::validate_required_field("summary", &summary)?;
        crate::validation::validate_required_field("committee", &committee)?;
        crate::validation::validate_required_field("cbo_url", &cbo_url)?;
        crate::validation::validate_required_field("pdf_url", &pdf_url)?;

        Ok(Self {
            title,
            code,
            summary,
            committee,
            published,
            cbo_url,
            pdf_url,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn committee(&self) -> &str {
        &self.committee
    }

    #[must_use]
    pub const fn published(&self) -> Date {
        self.published
    }

    /// Returns the external reference URL, the natural key of a bill.
    #[must_use]
    pub fn cbo_url(&self) -> &str {
        &self.cbo_url
    }

    #[must_use]
    pub fn pdf_url(&self) -> &str {
        &self.pdf_url
    }
}

/// A bill awaiting review. Pending bills never carry finances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBill {
    id: Option<i64>,
    details: BillDetails,
}

impl PendingBill {
    /// Creates a pending bill that has not been persisted yet.
    #[must_use]
    pub const fn new(details: BillDetails) -> Self {
        Self { id: None, details }
    }

    /// Creates a pending bill loaded from storage.
    #[must_use]
    pub const fn with_id(id: i64, details: BillDetails) -> Self {
        Self {
            id: Some(id),
            details,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    #[must_use]
    pub const fn details(&self) -> &BillDetails {
        &self.details
    }

    /// Records the identifier assigned by storage.
    pub const fn mark_persisted(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// A reviewed bill with its finance line items (possibly none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedBill {
    id: Option<i64>,
    details: BillDetails,
    finances: Vec<Finance>,
}

impl FinalizedBill {
    /// Creates a finalized bill that has not been persisted yet.
    #[must_use]
    pub const fn new(details: BillDetails, finances: Vec<Finance>) -> Self {
        Self {
            id: None,
            details,
            finances,
        }
    }

    /// Creates a finalized bill loaded from storage.
    #[must_use]
    pub const fn with_id(id: i64, details: BillDetails, finances: Vec<Finance>) -> Self {
        Self {
            id: Some(id),
            details,
            finances,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    #[must_use]
    pub const fn details(&self) -> &BillDetails {
        &self.details
    }

    #[must_use]
    pub fn finances(&self) -> &[Finance] {
        &self.finances
    }

    /// Returns the sum of all finance amounts.
    ///
    /// This is the value the `net` listing order sorts by.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FinanceTotalOverflow` if the sum does not fit
    /// in an `i64`.
    pub fn net_amount(&self) -> Result<i64, DomainError> {
        self.finances
            .iter()
            .enumerate()
            .try_fold(0_i64, |total, (index, finance)| {
                total
                    .checked_add(finance.amount())
                    .ok_or(DomainError::FinanceTotalOverflow { index })
            })
    }

    /// Records the identifier assigned by storage.
    pub const fn mark_persisted(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// Which stored collection a bill lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillCollection {
    Finalized,
    Pending,
}

impl BillCollection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Finalized => "finalized",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for BillCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bill in exactly one of its two lifecycle states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bill {
    Pending(PendingBill),
    Finalized(FinalizedBill),
}

impl Bill {
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        match self {
            Self::Pending(bill) => bill.id(),
            Self::Finalized(bill) => bill.id(),
        }
    }

    #[must_use]
    pub const fn details(&self) -> &BillDetails {
        match self {
            Self::Pending(bill) => bill.details(),
            Self::Finalized(bill) => bill.details(),
        }
    }

    /// Returns the finance line items, or `None` for a pending bill.
    #[must_use]
    pub fn finances(&self) -> Option<&[Finance]> {
        match self {
            Self::Pending(_) => None,
            Self::Finalized(bill) => Some(bill.finances()),
        }
    }

    #[must_use]
    pub const fn collection(&self) -> BillCollection {
        match self {
            Self::Pending(_) => BillCollection::Pending,
            Self::Finalized(_) => BillCollection::Finalized,
        }
    }
}
