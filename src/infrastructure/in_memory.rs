use crate::domain::payment::{Amount, PaymentMethod, PaymentRecord};
use crate::domain::ports::{PaymentStore, UserStore};
use crate::domain::user::{PasswordDigest, UserRecord, Username};
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for user accounts.
///
/// Uses `Arc<RwLock<HashMap<Username, UserRecord>>>` so clones share state.
/// Useful for tests and throwaway sessions where nothing should hit disk.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Username, UserRecord>>>,
}

impl InMemoryUserStore {
    /// Creates a new, empty in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, username: &Username, digest: &PasswordDigest) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(StorefrontError::DuplicateUsername);
        }
        let record = UserRecord {
            id: users.len() as i64 + 1,
            username: username.clone(),
            password_digest: digest.clone(),
        };
        users.insert(username.clone(), record.clone());
        Ok(record)
    }

    async fn find(&self, username: &Username) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }
}

/// A thread-safe in-memory ledger.
///
/// Records are kept in insertion order; ids are their 1-based position.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<Vec<PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn append(
        &self,
        username: &Username,
        amount: Amount,
        method: PaymentMethod,
    ) -> Result<PaymentRecord> {
        let mut payments = self.payments.write().await;
        let record = PaymentRecord {
            id: payments.len() as i64 + 1,
            username: username.clone(),
            amount,
            method,
        };
        payments.push(record.clone());
        Ok(record)
    }

    async fn for_user(&self, username: &Username) -> Result<Vec<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .filter(|p| &p.username == username)
            .cloned()
            .collect())
    }

    async fn all_payments(&self) -> Result<Vec<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments.clone())
    }
}
