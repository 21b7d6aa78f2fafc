// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required bill field is empty.
    EmptyField {
        /// The name of the empty field.
        field: &'static str,
    },
    /// The published value is not a recognised date or date-time.
    InvalidPublishedDate {
        /// The rejected value.
        value: String,
    },
    /// A finance timespan is not a positive number of years.
    InvalidFinanceTimespan(i32),
    /// A finance line item in a payload is invalid.
    InvalidFinance {
        /// Zero-based position of the line item in the payload.
        index: usize,
        /// Description of the validation error.
        reason: String,
    },
    /// The requested sort key is not one of the supported keys.
    InvalidOrderKey(String),
    /// The requested sort direction is neither `asc` nor `desc`.
    InvalidOrderDirection(String),
    /// The order parameter is not of the form `<key> <direction>`.
    MalformedOrder(String),
    /// A Unix timestamp or stored timestamp could not be interpreted.
    InvalidTimestamp {
        /// The rejected value.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// A date or timestamp could not be rendered in its stored format.
    DateFormatting {
        /// The value that failed to format.
        value: String,
        /// The formatting error message.
        error: String,
    },
    /// The finance amounts of one bill do not sum to a representable total.
    FinanceTotalOverflow {
        /// Zero-based position of the line item that overflowed the total.
        index: usize,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "Field '{field}' cannot be empty"),
            Self::InvalidPublishedDate { value } => {
                write!(f, "Invalid published date: '{value}'")
            }
            Self::InvalidFinanceTimespan(timespan) => {
                write!(
                    f,
                    "Invalid finance timespan: {timespan}. Must be greater than 0"
                )
            }
            Self::InvalidFinance { index, reason } => {
                write!(f, "Invalid finance entry at position {index}: {reason}")
            }
            Self::InvalidOrderKey(key) => {
                write!(
                    f,
                    "Unknown order key '{key}'. Expected one of: date, committee, net"
                )
            }
            Self::InvalidOrderDirection(direction) => {
                write!(
                    f,
                    "Unknown order direction '{direction}'. Expected asc or desc"
                )
            }
            Self::MalformedOrder(order) => {
                write!(
                    f,
                    "Malformed order '{order}'. Expected '<key> <direction>'"
                )
            }
            Self::InvalidTimestamp { value, error } => {
                write!(f, "Invalid timestamp '{value}': {error}")
            }
            Self::DateFormatting { value, error } => {
                write!(f, "Failed to format date '{value}': {error}")
            }
            Self::FinanceTotalOverflow { index } => {
                write!(
                    f,
                    "Finance amounts overflow the bill total at position {index}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
