// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dates::parse_published;
use crate::error::DomainError;
use crate::types::{BillDetails, BillInput, Finance, FinanceInput};

/// Validates that a required string field is not empty or whitespace.
///
/// # Errors
///
/// Returns `DomainError::EmptyField` naming the field.
pub fn validate_required_field(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(())
}

/// Validates a raw bill payload and converts it into bill details.
///
/// The whole payload is rejected on the first failing field; no partially
/// populated details are ever returned.
///
/// # Errors
///
/// Returns an error if:
/// - Any string field is empty
/// - `published` is not a recognised date or date-time
pub fn validate_bill_input(input: BillInput) -> Result<BillDetails, DomainError> {
    // Empty published reports as an empty field, not as a bad date
    validate_required_field("published", &input.published)?;
    let published = parse_published(&input.published)?;

    BillDetails::new(
        input.title,
        input.code,
        input.summary,
        input.committee,
        published,
        input.cbo_url,
        input.pdf_url,
    )
}

/// Validates raw finance payloads.
///
/// The running total of the amounts must also fit in an `i64`.
///
/// # Errors
///
/// Returns `DomainError::InvalidFinance` with the position of the first
/// invalid line item, or of the item whose amount overflows the total.
pub fn validate_finances(inputs: &[FinanceInput]) -> Result<Vec<Finance>, DomainError> {
    let mut finances: Vec<Finance> = Vec::with_capacity(inputs.len());
    let mut total: i64 = 0;

    for (index, input) in inputs.iter().enumerate() {
        let finance = Finance::new(input.timespan, input.amount).map_err(|e| {
            DomainError::InvalidFinance {
                index,
                reason: e.to_string(),
            }
        })?;
        total = total
            .checked_add(finance.amount())
            .ok_or_else(|| DomainError::InvalidFinance {
                index,
                reason: DomainError::FinanceTotalOverflow { index }.to_string(),
            })?;
        finances.push(finance);
    }

    Ok(finances)
}
