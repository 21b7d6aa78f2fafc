// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bill id selection for listings.
//!
//! The planner only ever returns primary keys. Hydration happens afterwards,
//! one id at a time, so the ordered id list is the single source of page
//! order.
//!
//! Sort keys map to physical expressions through a closed `match`; request
//! text never reaches the ORDER BY clause. Every ordering ends with the
//! primary key in the same direction so ties are broken the same way on
//! every request and offset pages never overlap.

use billwatch_domain::{BillFilters, BillOrder, OrderDirection, OrderKey, format_date};
use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use time::Date;
use tracing::debug;

use crate::diesel_schema::{bills, pending_bills};
use crate::error::PersistenceError;

/// Correlated sum of a bill's finance amounts; bills without finances net 0.
const NET_AMOUNT_SQL: &str =
    "(SELECT COALESCE(SUM(finances.amount), 0) FROM finances WHERE finances.bill_id = bills.bill_id)";

fn net_amount() -> SqlLiteral<BigInt> {
    sql::<BigInt>(NET_AMOUNT_SQL)
}

fn to_sql_offset(start: u64) -> Result<i64, PersistenceError> {
    start
        .to_i64()
        .ok_or_else(|| PersistenceError::InvalidParameter {
            parameter: "start",
            message: format!("offset {start} is too large"),
        })
}

fn to_sql_limit(limit: usize) -> Result<i64, PersistenceError> {
    limit
        .to_i64()
        .ok_or_else(|| PersistenceError::InvalidParameter {
            parameter: "limit",
            message: format!("limit {limit} is too large"),
        })
}

fn to_sql_date(parameter: &'static str, date: Date) -> Result<String, PersistenceError> {
    format_date(date).map_err(|e| PersistenceError::InvalidParameter {
        parameter,
        message: e.to_string(),
    })
}

backend_fn! {
/// Selects the ids of finalized bills matching `filters`, in `order`.
///
/// Skips `filters.start` matching rows and returns at most `limit` ids.
/// Absent filters add no predicate at all.
///
/// # Errors
///
/// Returns an error if the offset or limit cannot be represented or the
/// query fails.
pub fn select_bill_ids(
    conn: &mut _,
    order: BillOrder,
    filters: &BillFilters,
    limit: usize,
) -> Result<Vec<i64>, PersistenceError> {
    let offset: i64 = to_sql_offset(filters.start)?;
    let limit: i64 = to_sql_limit(limit)?;

    let mut query = bills::table.select(bills::bill_id).into_boxed();

    if let Some(before) = filters.before {
        query = query.filter(bills::published.le(to_sql_date("before", before)?));
    }
    if let Some(after) = filters.after {
        query = query.filter(bills::published.ge(to_sql_date("after", after)?));
    }
    if let Some(committee) = &filters.committee {
        query = query.filter(bills::committee.eq(committee.clone()));
    }

    query = match (order.key, order.direction) {
        (OrderKey::Date, OrderDirection::Asc) => {
            query.order_by((bills::published.asc(), bills::bill_id.asc()))
        }
        (OrderKey::Date, OrderDirection::Desc) => {
            query.order_by((bills::published.desc(), bills::bill_id.desc()))
        }
        (OrderKey::Committee, OrderDirection::Asc) => {
            query.order_by((bills::committee.asc(), bills::bill_id.asc()))
        }
        (OrderKey::Committee, OrderDirection::Desc) => {
            query.order_by((bills::committee.desc(), bills::bill_id.desc()))
        }
        (OrderKey::Net, OrderDirection::Asc) => {
            query.order_by((net_amount().asc(), bills::bill_id.asc()))
        }
        (OrderKey::Net, OrderDirection::Desc) => {
            query.order_by((net_amount().desc(), bills::bill_id.desc()))
        }
    };

    debug!(%order, ?filters, limit, "Selecting bill ids");

    let ids: Vec<i64> = query.offset(offset).limit(limit).load(conn)?;
    Ok(ids)
}
}

backend_fn! {
/// Selects the ids of pending bills, oldest published first.
///
/// # Errors
///
/// Returns an error if the offset or limit cannot be represented or the
/// query fails.
pub fn select_pending_bill_ids(
    conn: &mut _,
    start: u64,
    limit: usize,
) -> Result<Vec<i64>, PersistenceError> {
    let offset: i64 = to_sql_offset(start)?;
    let limit: i64 = to_sql_limit(limit)?;

    debug!(start, limit, "Selecting pending bill ids");

    let ids: Vec<i64> = pending_bills::table
        .select(pending_bills::pending_id)
        .order_by((pending_bills::published.asc(), pending_bills::pending_id.asc()))
        .offset(offset)
        .limit(limit)
        .load(conn)?;
    Ok(ids)
}
}
