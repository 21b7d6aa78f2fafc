// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod bill_tests;

use crate::Persistence;
use billwatch_domain::{
    BillInput, FinalizedBill, Finance, PendingBill, validate_bill_input,
};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_input(n: u32, published: &str, committee: &str) -> BillInput {
    BillInput {
        title: format!("Act {n}"),
        code: format!("HR-{n}"),
        summary: format!("Summary of act {n}"),
        committee: committee.to_string(),
        published: published.to_string(),
        cbo_url: format!("http://cbo.example/{n}"),
        pdf_url: format!("http://cbo.example/{n}.pdf"),
    }
}

pub fn create_finalized(
    n: u32,
    published: &str,
    committee: &str,
    finances: &[(i32, i64)],
) -> FinalizedBill {
    let details = validate_bill_input(create_test_input(n, published, committee)).unwrap();
    let finances = finances
        .iter()
        .map(|(timespan, amount)| Finance::new(*timespan, *amount).unwrap())
        .collect();
    FinalizedBill::new(details, finances)
}

pub fn create_pending(n: u32, published: &str, committee: &str) -> PendingBill {
    PendingBill::new(validate_bill_input(create_test_input(n, published, committee)).unwrap())
}

/// Finalizes a bill and returns its id.
pub fn seed_bill(
    persistence: &mut Persistence,
    n: u32,
    published: &str,
    committee: &str,
    finances: &[(i32, i64)],
) -> i64 {
    let mut bill = create_finalized(n, published, committee, finances);
    persistence.finalize_bill(&mut bill).unwrap()
}
