// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// The logical sort keys a bill listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKey {
    /// Publication date.
    Date,
    /// Originating committee name.
    Committee,
    /// Sum of all finance amounts attached to the bill.
    Net,
}

impl FromStr for OrderKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "committee" => Ok(Self::Committee),
            "net" => Ok(Self::Net),
            _ => Err(DomainError::InvalidOrderKey(s.to_string())),
        }
    }
}

impl std::fmt::Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl OrderKey {
    /// Converts this key to the form used in request parameters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Committee => "committee",
            Self::Net => "net",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl FromStr for OrderDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(DomainError::InvalidOrderDirection(s.to_string())),
        }
    }
}

impl std::fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl OrderDirection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A complete listing order: one key and one direction.
///
/// The textual form is `<key> <direction>`, e.g. `date desc`. In a query
/// string the separator usually arrives encoded as `+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BillOrder {
    /// The sort key.
    pub key: OrderKey,
    /// The sort direction.
    pub direction: OrderDirection,
}

impl BillOrder {
    #[must_use]
    pub const fn new(key: OrderKey, direction: OrderDirection) -> Self {
        Self { key, direction }
    }
}

impl FromStr for BillOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(' ').collect();
        let [key, direction] = parts.as_slice() else {
            return Err(DomainError::MalformedOrder(s.to_string()));
        };

        Ok(Self {
            key: key.parse()?,
            direction: direction.parse()?,
        })
    }
}

impl std::fmt::Display for BillOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.key, self.direction)
    }
}

/// Optional, conjunctive restrictions on a bill listing.
///
/// `before` and `after` are inclusive bounds on the published date.
/// `start` is the zero-based row offset of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilters {
    /// Only bills published on or before this date.
    pub before: Option<Date>,
    /// Only bills published on or after this date.
    pub after: Option<Date>,
    /// Only bills from exactly this committee.
    pub committee: Option<String>,
    /// Number of matching rows to skip.
    pub start: u64,
}

impl BillFilters {
    /// Returns true when no row predicate is active. The offset is not a
    /// predicate.
    #[must_use]
    pub const fn has_predicates(&self) -> bool {
        self.before.is_some() || self.after.is_some() || self.committee.is_some()
    }
}
