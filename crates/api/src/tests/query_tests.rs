// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use billwatch_domain::{OrderDirection, OrderKey};
use time::macros::date;

use super::helpers::list_query;
use crate::{
    ApiError, ListBillsQuery, ListPendingQuery, parse_list_query, parse_pending_query,
    pending_next_link,
};

fn invalid_field(result: Result<impl std::fmt::Debug, ApiError>) -> String {
    match result {
        Err(ApiError::InvalidInput { field, .. }) => field,
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_order_is_required() {
    let field = invalid_field(parse_list_query(&ListBillsQuery::default()));
    assert_eq!(field, "order");
}

#[test]
fn test_order_parses_key_and_direction() {
    let request = parse_list_query(&list_query("net desc")).unwrap();
    assert_eq!(request.order.key, OrderKey::Net);
    assert_eq!(request.order.direction, OrderDirection::Desc);
    assert_eq!(request.filters.start, 0);
    assert!(!request.filters.has_predicates());
}

#[test]
fn test_malformed_orders_are_rejected() {
    for order in ["date", "date asc extra", "price asc", "date up", "", "DATE asc"] {
        let field = invalid_field(parse_list_query(&list_query(order)));
        assert_eq!(field, "order", "order '{order}' should be rejected");
    }
}

#[test]
fn test_start_must_be_non_negative_integer() {
    for start in ["-1", "abc", "1.5", ""] {
        let query = ListBillsQuery {
            start: Some(start.to_string()),
            ..list_query("date asc")
        };
        assert_eq!(invalid_field(parse_list_query(&query)), "start");
    }

    let query = ListBillsQuery {
        start: Some(String::from("40")),
        ..list_query("date asc")
    };
    assert_eq!(parse_list_query(&query).unwrap().filters.start, 40);
}

#[test]
fn test_timestamps_become_utc_dates() {
    let query = ListBillsQuery {
        before: Some(String::from("1717200000")),
        after: Some(String::from("1704067199")),
        ..list_query("date asc")
    };
    let request = parse_list_query(&query).unwrap();

    assert_eq!(request.filters.before, Some(date!(2024 - 06 - 01)));
    assert_eq!(request.filters.after, Some(date!(2023 - 12 - 31)));
}

#[test]
fn test_non_integer_timestamps_are_rejected() {
    let query = ListBillsQuery {
        before: Some(String::from("yesterday")),
        ..list_query("date asc")
    };
    assert_eq!(invalid_field(parse_list_query(&query)), "before");

    let query = ListBillsQuery {
        after: Some(String::from("2024-01-01")),
        ..list_query("date asc")
    };
    assert_eq!(invalid_field(parse_list_query(&query)), "after");
}

#[test]
fn test_out_of_range_timestamp_is_rejected() {
    let query = ListBillsQuery {
        after: Some(i64::MAX.to_string()),
        ..list_query("date asc")
    };
    assert_eq!(invalid_field(parse_list_query(&query)), "after");
}

#[test]
fn test_next_link_with_order_only() {
    let request = parse_list_query(&list_query("date desc")).unwrap();
    assert_eq!(request.next_link(25), "/bills?order=date+desc&start=25");
}

#[test]
fn test_next_link_carries_filters_in_order() {
    let query = ListBillsQuery {
        order: Some(String::from("committee asc")),
        start: Some(String::from("10")),
        before: Some(String::from("1717200000")),
        after: Some(String::from("0")),
        committee: Some(String::from("Ways & Means")),
    };
    let request = parse_list_query(&query).unwrap();

    assert_eq!(
        request.next_link(20),
        "/bills?order=committee+asc&before=1717200000&after=0&committee=Ways+%26+Means&start=20"
    );
}

#[test]
fn test_pending_query_defaults_to_zero() {
    assert_eq!(parse_pending_query(&ListPendingQuery::default()).unwrap(), 0);

    let query = ListPendingQuery {
        start: Some(String::from("7")),
    };
    assert_eq!(parse_pending_query(&query).unwrap(), 7);

    let query = ListPendingQuery {
        start: Some(String::from("seven")),
    };
    assert_eq!(invalid_field(parse_pending_query(&query)), "start");
}

#[test]
fn test_pending_next_link() {
    assert_eq!(pending_next_link(50), "/bills/pending?start=50");
}
