// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BillFilters, BillOrder, DomainError, OrderDirection, OrderKey};
use time::macros::date;

#[test]
fn test_order_parses_every_supported_key() {
    let date_desc: BillOrder = "date desc".parse().unwrap();
    assert_eq!(date_desc, BillOrder::new(OrderKey::Date, OrderDirection::Desc));

    let committee_asc: BillOrder = "committee asc".parse().unwrap();
    assert_eq!(
        committee_asc,
        BillOrder::new(OrderKey::Committee, OrderDirection::Asc)
    );

    let net_desc: BillOrder = "net desc".parse().unwrap();
    assert_eq!(net_desc.key, OrderKey::Net);
}

#[test]
fn test_order_rejects_unknown_key() {
    let result: Result<BillOrder, _> = "title asc".parse();
    assert_eq!(result, Err(DomainError::InvalidOrderKey(String::from("title"))));
}

#[test]
fn test_order_rejects_unknown_direction() {
    let result: Result<BillOrder, _> = "date sideways".parse();
    assert_eq!(
        result,
        Err(DomainError::InvalidOrderDirection(String::from("sideways")))
    );
}

#[test]
fn test_order_requires_exactly_two_parts() {
    for raw in ["date", "", "date desc extra", "date  desc"] {
        let result: Result<BillOrder, _> = raw.parse();
        assert_eq!(result, Err(DomainError::MalformedOrder(String::from(raw))));
    }
}

#[test]
fn test_order_keys_are_case_sensitive() {
    assert!("Date desc".parse::<BillOrder>().is_err());
    assert!("date DESC".parse::<BillOrder>().is_err());
}

#[test]
fn test_order_display_round_trips_request_form() {
    let order = BillOrder::new(OrderKey::Committee, OrderDirection::Desc);
    assert_eq!(order.to_string(), "committee desc");
    assert_eq!(order.to_string().parse::<BillOrder>().unwrap(), order);
}

#[test]
fn test_default_filters_have_no_predicates() {
    let filters = BillFilters::default();
    assert!(!filters.has_predicates());
    assert_eq!(filters.start, 0);

    let offset_only = BillFilters {
        start: 50,
        ..BillFilters::default()
    };
    assert!(!offset_only.has_predicates());
}

#[test]
fn test_any_bound_is_a_predicate() {
    let filters = BillFilters {
        after: Some(date!(2024 - 01 - 01)),
        ..BillFilters::default()
    };
    assert!(filters.has_predicates());

    let filters = BillFilters {
        committee: Some(String::from("Finance")),
        ..BillFilters::default()
    };
    assert!(filters.has_predicates());
}
