// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use billwatch::PageSize;
use billwatch_domain::{BillInput, FinanceInput, PendingBill, validate_bill_input};
use billwatch_persistence::Persistence;
use serde_json::json;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{ListBillsQuery, SubmitBillRequest, submit_bill};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Fixed "current time" for staleness checks.
pub fn test_now() -> OffsetDateTime {
    datetime!(2024-06-01 12:00:00 UTC)
}

pub fn page_size(size: usize) -> PageSize {
    PageSize::new(size).expect("Valid page size")
}

pub fn create_submit_request(
    n: u32,
    published: &str,
    committee: &str,
    finances: &[(i32, i64)],
) -> SubmitBillRequest {
    SubmitBillRequest {
        title: format!("Act {n}"),
        code: format!("HR-{n}"),
        summary: format!("Summary of act {n}"),
        committee: committee.to_string(),
        published: published.to_string(),
        cbo_url: format!("http://cbo.example/{n}"),
        pdf_url: format!("http://cbo.example/{n}.pdf"),
        finances: finances
            .iter()
            .map(|&(timespan, amount)| FinanceInput { timespan, amount })
            .collect(),
    }
}

/// Submits a bill and returns its id.
pub fn seed_bill(
    persistence: &mut Persistence,
    n: u32,
    published: &str,
    committee: &str,
    finances: &[(i32, i64)],
) -> i64 {
    submit_bill(
        persistence,
        create_submit_request(n, published, committee, finances),
    )
    .expect("Seed bill should finalize")
    .id
}

/// Queues a pending bill directly and returns its id.
pub fn seed_pending(persistence: &mut Persistence, n: u32, published: &str) -> i64 {
    let input = BillInput {
        title: format!("Act {n}"),
        code: format!("HR-{n}"),
        summary: format!("Summary of act {n}"),
        committee: String::from("Finance"),
        published: published.to_string(),
        cbo_url: format!("http://cbo.example/{n}"),
        pdf_url: format!("http://cbo.example/{n}.pdf"),
    };
    let mut bill = PendingBill::new(validate_bill_input(input).unwrap());
    persistence.insert_pending_bill(&mut bill).unwrap();
    bill.id().unwrap()
}

pub fn list_query(order: &str) -> ListBillsQuery {
    ListBillsQuery {
        order: Some(order.to_string()),
        ..ListBillsQuery::default()
    }
}

pub fn feed_entry(n: u32, published: &str) -> serde_json::Value {
    json!({
        "title": format!("Feed act {n}"),
        "code": format!("S-{n}"),
        "summary": "From the feed",
        "committee": "Budget",
        "published": published,
        "cbo_url": format!("http://cbo.example/feed/{n}"),
        "pdf_url": format!("http://cbo.example/feed/{n}.pdf"),
    })
}

pub fn write_feed(dir: &Path, entries: &serde_json::Value) -> PathBuf {
    let path: PathBuf = dir.join("feed.json");
    std::fs::write(&path, entries.to_string()).expect("Failed to write feed");
    path
}
