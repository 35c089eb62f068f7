//! Index names and explicit mappings.

use serde_json::{Value, json};
use tracing::info;

use super::ElasticsearchClient;
use crate::domain::ports::DocumentStoreError;

pub(super) const CUSTOMERS: &str = "customers";
pub(super) const PAYMENTS: &str = "payments";
pub(super) const NOTIFICATIONS: &str = "notifications";
pub(super) const USERS: &str = "users";

fn customers_mapping() -> Value {
    json!({
        "properties": {
            "name": { "type": "text", "fields": { "keyword": { "type": "keyword" } } },
            "phoneNumber": { "type": "keyword" },
            "email": { "type": "keyword" },
            "outstandingPayment": { "type": "double" },
            "paymentDueDate": { "type": "date", "format": "strict_date" },
            "paymentStatus": { "type": "keyword" },
            "createdAt": { "type": "date" }
        }
    })
}

fn payments_mapping() -> Value {
    json!({
        "properties": {
            "customer": { "type": "text", "fields": { "keyword": { "type": "keyword" } } },
            "customerId": { "type": "keyword" },
            "amount": { "type": "double" },
            "date": { "type": "date", "format": "strict_date" },
            "status": { "type": "keyword" },
            "createdAt": { "type": "date" }
        }
    })
}

fn notifications_mapping() -> Value {
    json!({
        "properties": {
            "type": { "type": "keyword" },
            "message": { "type": "text" },
            "customerId": { "type": "keyword" },
            "paymentId": { "type": "keyword" },
            "timestamp": { "type": "date" },
            "read": { "type": "boolean" }
        }
    })
}

fn users_mapping() -> Value {
    json!({
        "properties": {
            "username": { "type": "keyword" },
            "email": { "type": "keyword" },
            "password": { "type": "keyword", "index": false },
            "createdAt": { "type": "date" },
            "updatedAt": { "type": "date" }
        }
    })
}

pub(super) fn all_mappings() -> [(&'static str, Value); 4] {
    [
        (CUSTOMERS, customers_mapping()),
        (PAYMENTS, payments_mapping()),
        (NOTIFICATIONS, notifications_mapping()),
        (USERS, users_mapping()),
    ]
}

/// Create every index the backend uses, leaving existing ones untouched.
///
/// # Errors
///
/// Returns the first store failure.
pub async fn ensure_indices(client: &ElasticsearchClient) -> Result<(), DocumentStoreError> {
    for (index, mapping) in all_mappings() {
        if client.ensure_index(index, &mapping).await? {
            info!(index, "document index created");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PAYMENTS, "customerId", "keyword")]
    #[case(PAYMENTS, "amount", "double")]
    #[case(PAYMENTS, "date", "date")]
    #[case(NOTIFICATIONS, "read", "boolean")]
    #[case(NOTIFICATIONS, "type", "keyword")]
    #[case(USERS, "email", "keyword")]
    #[case(CUSTOMERS, "paymentStatus", "keyword")]
    fn filtered_fields_use_exact_types(
        #[case] index: &str,
        #[case] field: &str,
        #[case] kind: &str,
    ) {
        let mappings = all_mappings();
        let (_, mapping) = mappings
            .iter()
            .find(|(name, _)| *name == index)
            .expect("index mapped");
        assert_eq!(mapping["properties"][field]["type"], kind);
    }
}
