//! In-memory repositories with store-assigned identifiers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::ports::{
    CustomerRepository, DocumentStoreError, NotificationRepository, PaymentQuery,
    PaymentRepository, UserRepository,
};
use crate::domain::{
    Customer, CustomerPatch, CustomerRecord, DocumentId, Notification, NotificationDraft,
    Payment, PaymentRecord, PaymentStatus, User, UserId,
};

/// Ordered documents plus an id sequence and an outage switch.
struct Table<T> {
    prefix: &'static str,
    next_id: AtomicU64,
    rows: Mutex<Vec<T>>,
    offline: AtomicBool,
}

impl<T: Clone> Table<T> {
    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next_id: AtomicU64::new(1),
            rows: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    fn next_id(&self) -> DocumentId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        match DocumentId::new(format!("{}-{n}", self.prefix)) {
            Ok(id) => id,
            Err(error) => panic!("generated id rejected: {error}"),
        }
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<T>>, DocumentStoreError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(DocumentStoreError::connection("in-memory store offline"));
        }
        match self.rows.lock() {
            Ok(guard) => Ok(guard),
            Err(_) => panic!("{} table mutex", self.prefix),
        }
    }

    fn snapshot(&self) -> Vec<T> {
        match self.rows.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => panic!("{} table mutex", self.prefix),
        }
    }
}

macro_rules! table_accessors {
    ($store:ty, $item:ty) => {
        impl $store {
            /// Every stored document, in insertion order.
            pub fn all(&self) -> Vec<$item> {
                self.0.snapshot()
            }

            /// Make every subsequent call fail with a connection error.
            pub fn go_offline(&self) {
                self.0.offline.store(true, Ordering::Relaxed);
            }
        }
    };
}

/// In-memory [`CustomerRepository`]. Ids are `cust-{n}`.
pub struct InMemoryCustomers(Table<Customer>);

impl Default for InMemoryCustomers {
    fn default() -> Self {
        Self(Table::new("cust"))
    }
}

table_accessors!(InMemoryCustomers, Customer);

#[async_trait]
impl CustomerRepository for InMemoryCustomers {
    async fn insert(&self, record: &CustomerRecord) -> Result<Customer, DocumentStoreError> {
        let mut rows = self.0.rows()?;
        let customer = Customer {
            id: self.0.next_id(),
            record: record.clone(),
        };
        rows.push(customer.clone());
        Ok(customer)
    }

    async fn list(&self, limit: usize) -> Result<Vec<Customer>, DocumentStoreError> {
        Ok(self.0.rows()?.iter().take(limit).cloned().collect())
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<Customer>, DocumentStoreError> {
        Ok(self.0.rows()?.iter().find(|c| c.id == *id).cloned())
    }

    async fn update(
        &self,
        id: &DocumentId,
        patch: &CustomerPatch,
    ) -> Result<bool, DocumentStoreError> {
        let mut rows = self.0.rows()?;
        Ok(rows
            .iter_mut()
            .find(|c| c.id == *id)
            .map(|customer| customer.record.apply(patch))
            .is_some())
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DocumentStoreError> {
        let mut rows = self.0.rows()?;
        let before = rows.len();
        rows.retain(|c| c.id != *id);
        Ok(rows.len() != before)
    }

    async fn count(&self) -> Result<u64, DocumentStoreError> {
        Ok(self.0.rows()?.len() as u64)
    }
}

/// In-memory [`PaymentRepository`]. Ids are `pay-{n}`.
pub struct InMemoryPayments(Table<Payment>);

impl Default for InMemoryPayments {
    fn default() -> Self {
        Self(Table::new("pay"))
    }
}

table_accessors!(InMemoryPayments, Payment);

impl InMemoryPayments {
    fn select(&self, query: &PaymentQuery) -> Result<Vec<Payment>, DocumentStoreError> {
        let mut matched: Vec<Payment> = self
            .0
            .rows()?
            .iter()
            .filter(|payment| query.matches(payment))
            .cloned()
            .collect();
        if query.newest_first {
            matched.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));
        }
        Ok(matched)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPayments {
    async fn insert(&self, record: &PaymentRecord) -> Result<Payment, DocumentStoreError> {
        let mut rows = self.0.rows()?;
        let payment = Payment {
            id: self.0.next_id(),
            record: record.clone(),
        };
        rows.push(payment.clone());
        Ok(payment)
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<Payment>, DocumentStoreError> {
        Ok(self.0.rows()?.iter().find(|p| p.id == *id).cloned())
    }

    async fn list(&self, query: &PaymentQuery) -> Result<Vec<Payment>, DocumentStoreError> {
        let mut matched = self.select(query)?;
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn update_status(
        &self,
        id: &DocumentId,
        status: PaymentStatus,
    ) -> Result<bool, DocumentStoreError> {
        let mut rows = self.0.rows()?;
        Ok(rows
            .iter_mut()
            .find(|p| p.id == *id)
            .map(|payment| payment.record.status = status)
            .is_some())
    }

    async fn sum_amount(&self, query: &PaymentQuery) -> Result<f64, DocumentStoreError> {
        Ok(self
            .select(query)?
            .iter()
            .map(|payment| payment.record.amount)
            .sum())
    }
}

/// In-memory [`NotificationRepository`]. Ids are `note-{n}`.
pub struct InMemoryNotifications(Table<Notification>);

impl Default for InMemoryNotifications {
    fn default() -> Self {
        Self(Table::new("note"))
    }
}

table_accessors!(InMemoryNotifications, Notification);

#[async_trait]
impl NotificationRepository for InMemoryNotifications {
    async fn insert(&self, draft: &NotificationDraft) -> Result<Notification, DocumentStoreError> {
        let mut rows = self.0.rows()?;
        let notification = Notification {
            id: self.0.next_id(),
            draft: draft.clone(),
        };
        rows.push(notification.clone());
        Ok(notification)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Notification>, DocumentStoreError> {
        let mut rows = self.0.rows()?.clone();
        rows.sort_by(|a, b| b.draft.timestamp.cmp(&a.draft.timestamp));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn count_unread(&self) -> Result<u64, DocumentStoreError> {
        Ok(self.0.rows()?.iter().filter(|n| !n.draft.read).count() as u64)
    }

    async fn set_read(&self, id: &DocumentId, read: bool) -> Result<bool, DocumentStoreError> {
        let mut rows = self.0.rows()?;
        Ok(rows
            .iter_mut()
            .find(|n| n.id == *id)
            .map(|notification| notification.draft.read = read)
            .is_some())
    }
}

/// In-memory [`UserRepository`].
pub struct InMemoryUsers(Table<User>);

impl Default for InMemoryUsers {
    fn default() -> Self {
        Self(Table::new("user"))
    }
}

table_accessors!(InMemoryUsers, User);

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: &User) -> Result<(), DocumentStoreError> {
        self.0.rows()?.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DocumentStoreError> {
        Ok(self.0.rows()?.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DocumentStoreError> {
        Ok(self.0.rows()?.iter().find(|u| u.email == email).cloned())
    }
}
