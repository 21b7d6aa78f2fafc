// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use billwatch::{CoreError, UpdateError};
use billwatch_domain::DomainError;
use billwatch_persistence::PersistenceError;

use crate::update_task::RefreshError;

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and represent
/// the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
/// Every variant except a formatting failure is a problem with client input.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: String = match &err {
        DomainError::EmptyField { field } => (*field).to_string(),
        DomainError::InvalidPublishedDate { .. } => String::from("published"),
        DomainError::InvalidFinanceTimespan(_) => String::from("finances"),
        DomainError::InvalidFinance { index, .. }
        | DomainError::FinanceTotalOverflow { index } => format!("finances[{index}]"),
        DomainError::InvalidOrderKey(_)
        | DomainError::InvalidOrderDirection(_)
        | DomainError::MalformedOrder(_) => String::from("order"),
        DomainError::InvalidTimestamp { .. } => String::from("timestamp"),
        DomainError::DateFormatting { .. } => {
            return ApiError::Internal {
                message: err.to_string(),
            };
        }
    };

    ApiError::InvalidInput {
        field,
        message: err.to_string(),
    }
}

/// Translates a persistence error into an API error.
///
/// A unique-key collision is the only storage failure a client can cause
/// and fix; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UniqueViolation(msg) => ApiError::DomainRuleViolation {
            rule: String::from("unique_cbo_url"),
            message: format!("A bill with this cbo_url already exists: {msg}"),
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        PersistenceError::InvalidParameter {
            parameter: parameter @ ("start" | "before" | "after" | "finances"),
            message,
        } => ApiError::InvalidInput {
            field: String::from(parameter),
            message,
        },
        other => ApiError::Internal {
            message: format!("Storage failure: {other}"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::InvalidPageSize(size) => ApiError::InvalidInput {
            field: String::from("page_size"),
            message: format!("Invalid page size {size}: must be greater than 0"),
        },
        other => ApiError::Internal {
            message: format!("Update lock failure: {other}"),
        },
    }
}

/// Translates a failed coordinated update into an API error.
#[must_use]
pub fn translate_update_error(err: UpdateError<RefreshError>) -> ApiError {
    match err {
        UpdateError::Lock(core) => translate_core_error(core),
        UpdateError::Task(task) => ApiError::Internal {
            message: format!("Update failed: {task}"),
        },
    }
}
