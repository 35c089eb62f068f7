//! Query DSL builders.

use serde_json::{Map, Value, json};

use crate::domain::ports::PaymentQuery;

pub(super) fn match_all() -> Value {
    json!({ "match_all": {} })
}

pub(super) fn term(field: &str, value: impl Into<Value>) -> Value {
    let mut clause = Map::new();
    clause.insert(field.to_owned(), value.into());
    json!({ "term": clause })
}

/// Filter clause for a payment query; `match_all` when unfiltered.
pub(super) fn payment_filter(query: &PaymentQuery) -> Value {
    let mut filters = Vec::new();
    if let Some(customer_id) = &query.customer_id {
        filters.push(term("customerId", customer_id.as_str()));
    }
    if let Some(status) = query.status {
        filters.push(term("status", status.as_str()));
    }
    if let Some(date) = query.date_before {
        filters.push(json!({
            "range": { "date": { "lt": date.format("%Y-%m-%d").to_string() } }
        }));
    }
    if filters.is_empty() {
        match_all()
    } else {
        json!({ "bool": { "filter": filters } })
    }
}

/// Full search body for a payment query.
pub(super) fn payment_search(query: &PaymentQuery, default_limit: usize) -> Value {
    let mut body = json!({
        "query": payment_filter(query),
        "size": query.limit.unwrap_or(default_limit),
    });
    if query.newest_first {
        body["sort"] = json!([{ "createdAt": { "order": "desc" } }]);
    }
    body
}
