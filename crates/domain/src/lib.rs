// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod dates;
mod error;
mod order;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use dates::{
    date_from_unix_timestamp, format_date, format_timestamp, parse_date, parse_published,
    parse_timestamp,
};
pub use error::DomainError;
pub use order::{BillFilters, BillOrder, OrderDirection, OrderKey};
pub use types::{
    Bill, BillCollection, BillDetails, BillInput, Finance, FinanceInput, FinalizedBill,
    PendingBill,
};
pub use validation::{validate_bill_input, validate_finances, validate_required_field};
