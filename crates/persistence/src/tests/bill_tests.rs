// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_finalized, create_pending, create_test_persistence};
use crate::{BackendConnection, PendingInsert, PersistenceError};
use billwatch_domain::{Bill, BillCollection, Finance};
use diesel::prelude::*;
use time::macros::date;

#[test]
fn test_load_missing_bill_is_none() {
    let mut persistence = create_test_persistence();

    assert!(
        persistence
            .load_bill(42, BillCollection::Finalized)
            .unwrap()
            .is_none()
    );
    assert!(
        persistence
            .load_bill(42, BillCollection::Pending)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_finalize_assigns_id_and_round_trips() {
    let mut persistence = create_test_persistence();
    let mut bill = create_finalized(1, "2024-01-01", "Finance", &[(10, 5000), (1, -20)]);

    let bill_id = persistence.finalize_bill(&mut bill).unwrap();
    assert_eq!(bill.id(), Some(bill_id));

    let loaded = persistence
        .load_bill(bill_id, BillCollection::Finalized)
        .unwrap()
        .unwrap();
    let Bill::Finalized(loaded) = loaded else {
        panic!("expected a finalized bill");
    };

    assert_eq!(loaded.id(), Some(bill_id));
    assert_eq!(loaded.details(), bill.details());
    assert_eq!(loaded.details().published(), date!(2024 - 01 - 01));

    let mut expected: Vec<Finance> = bill.finances().to_vec();
    let mut actual: Vec<Finance> = loaded.finances().to_vec();
    expected.sort_by_key(|f| (f.timespan(), f.amount()));
    actual.sort_by_key(|f| (f.timespan(), f.amount()));
    assert_eq!(actual, expected);
}

#[test]
fn test_finalize_without_finances_loads_empty_list() {
    let mut persistence = create_test_persistence();
    let mut bill = create_finalized(1, "2024-01-01", "Finance", &[]);
    let bill_id = persistence.finalize_bill(&mut bill).unwrap();

    let loaded = persistence
        .load_bill(bill_id, BillCollection::Finalized)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.finances(), Some(&[][..]));
}

#[test]
fn test_finalize_is_idempotent() {
    let mut persistence = create_test_persistence();
    let mut bill = create_finalized(1, "2024-01-01", "Finance", &[(10, 5000)]);

    let first = persistence.finalize_bill(&mut bill).unwrap();
    let second = persistence.finalize_bill(&mut bill).unwrap();

    assert_eq!(first, second);
    assert_eq!(persistence.count_bills().unwrap(), 1);

    let loaded = persistence
        .load_bill(first, BillCollection::Finalized)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.finances().map(<[Finance]>::len), Some(1));
}

#[test]
fn test_finalize_removes_pending_twin() {
    let mut persistence = create_test_persistence();
    let mut pending = create_pending(1, "2024-01-01", "Finance");
    let mut unrelated = create_pending(2, "2024-01-02", "Finance");
    persistence.insert_pending_bill(&mut pending).unwrap();
    persistence.insert_pending_bill(&mut unrelated).unwrap();
    assert_eq!(persistence.count_pending_bills().unwrap(), 2);

    let mut bill = create_finalized(1, "2024-01-01", "Finance", &[(10, 5000)]);
    persistence.finalize_bill(&mut bill).unwrap();

    assert_eq!(persistence.count_pending_bills().unwrap(), 1);
    assert!(
        persistence
            .load_bill(pending.id().unwrap(), BillCollection::Pending)
            .unwrap()
            .is_none()
    );
    assert!(
        persistence
            .load_bill(unrelated.id().unwrap(), BillCollection::Pending)
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_finalize_without_pending_twin_succeeds() {
    let mut persistence = create_test_persistence();
    let mut bill = create_finalized(7, "2024-01-01", "Finance", &[]);
    assert!(persistence.finalize_bill(&mut bill).is_ok());
    assert_eq!(persistence.count_pending_bills().unwrap(), 0);
}

#[test]
fn test_duplicate_cbo_url_rolls_back_everything() {
    let mut persistence = create_test_persistence();
    let mut original = create_finalized(1, "2024-01-01", "Finance", &[(10, 5000)]);
    persistence.finalize_bill(&mut original).unwrap();

    let mut pending = create_pending(1, "2024-01-01", "Finance");
    // Sneak a pending twin in behind the duplicate check
    if let BackendConnection::Sqlite(conn) = &mut persistence.conn {
        diesel::sql_query(
            "INSERT INTO pending_bills (title, code, summary, committee, published, cbo_url, pdf_url) \
             VALUES ('t', 'c', 's', 'm', '2024-01-01', 'http://cbo.example/1', 'p')",
        )
        .execute(conn)
        .unwrap();
    }
    assert_eq!(persistence.count_pending_bills().unwrap(), 1);

    let mut duplicate = create_finalized(1, "2024-01-01", "Finance", &[(5, 1), (6, 2)]);
    let result = persistence.finalize_bill(&mut duplicate);

    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
    assert_eq!(duplicate.id(), None);
    assert_eq!(persistence.count_bills().unwrap(), 1);
    // The pending twin survives because the transaction rolled back
    assert_eq!(persistence.count_pending_bills().unwrap(), 1);
    assert!(pending.id().is_none());
    assert_eq!(
        persistence.insert_pending_bill(&mut pending).unwrap(),
        PendingInsert::AlreadyKnown
    );
}

#[test]
fn test_insert_pending_assigns_id() {
    let mut persistence = create_test_persistence();
    let mut pending = create_pending(1, "2024-01-01", "Finance");

    let result = persistence.insert_pending_bill(&mut pending).unwrap();

    let PendingInsert::Inserted(pending_id) = result else {
        panic!("expected an insert");
    };
    assert_eq!(pending.id(), Some(pending_id));

    let loaded = persistence
        .load_bill(pending_id, BillCollection::Pending)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.collection(), BillCollection::Pending);
    assert!(loaded.finances().is_none());
    assert_eq!(loaded.details(), pending.details());
}

#[test]
fn test_insert_pending_skips_known_pending_url() {
    let mut persistence = create_test_persistence();
    let mut first = create_pending(1, "2024-01-01", "Finance");
    let mut again = create_pending(1, "2024-02-01", "Budget");

    persistence.insert_pending_bill(&mut first).unwrap();
    let result = persistence.insert_pending_bill(&mut again).unwrap();

    assert_eq!(result, PendingInsert::AlreadyKnown);
    assert_eq!(again.id(), None);
    assert_eq!(persistence.count_pending_bills().unwrap(), 1);
}

#[test]
fn test_insert_pending_skips_finalized_url() {
    let mut persistence = create_test_persistence();
    let mut bill = create_finalized(1, "2024-01-01", "Finance", &[]);
    persistence.finalize_bill(&mut bill).unwrap();

    let mut pending = create_pending(1, "2024-01-01", "Finance");
    let result = persistence.insert_pending_bill(&mut pending).unwrap();

    assert_eq!(result, PendingInsert::AlreadyKnown);
    assert_eq!(persistence.count_pending_bills().unwrap(), 0);
}

#[test]
fn test_insert_pending_with_id_is_noop() {
    let mut persistence = create_test_persistence();
    let mut pending = create_pending(1, "2024-01-01", "Finance");
    persistence.insert_pending_bill(&mut pending).unwrap();

    let result = persistence.insert_pending_bill(&mut pending).unwrap();
    assert_eq!(result, PendingInsert::AlreadyKnown);
    assert_eq!(persistence.count_pending_bills().unwrap(), 1);
}

#[test]
fn test_finance_rows_require_existing_bill() {
    let mut persistence = create_test_persistence();

    let BackendConnection::Sqlite(conn) = &mut persistence.conn else {
        panic!("expected SQLite");
    };
    let result = diesel::sql_query(
        "INSERT INTO finances (bill_id, timespan, amount) VALUES (999, 10, 100)",
    )
    .execute(conn);

    assert!(result.is_err());
}

#[test]
fn test_corrupt_stored_row_is_reported() {
    let mut persistence = create_test_persistence();
    let mut bill = create_finalized(1, "2024-01-01", "Finance", &[]);
    let bill_id = persistence.finalize_bill(&mut bill).unwrap();

    if let BackendConnection::Sqlite(conn) = &mut persistence.conn {
        diesel::sql_query("UPDATE bills SET published = 'not a date'")
            .execute(conn)
            .unwrap();
    }

    let result = persistence.load_bill(bill_id, BillCollection::Finalized);
    assert!(matches!(
        result,
        Err(PersistenceError::ReconstructionError(_))
    ));
}
