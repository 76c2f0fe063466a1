use crate::domain::payment::{Amount, PaymentMethod, PaymentRecord};
use crate::domain::ports::PaymentStoreBox;
use crate::domain::user::Username;
use crate::error::Result;

/// Append-only log of completed payments.
///
/// The ledger does not check that `username` belongs to a registered user.
pub struct Ledger {
    payments: PaymentStoreBox,
}

impl Ledger {
    pub fn new(payments: PaymentStoreBox) -> Self {
        Self { payments }
    }

    pub async fn record(
        &self,
        username: &Username,
        amount: Amount,
        method: PaymentMethod,
    ) -> Result<PaymentRecord> {
        let record = self.payments.append(username, amount, method).await?;
        tracing::info!(
            id = record.id,
            user = %record.username,
            amount = %record.amount,
            method = %record.method,
            "recorded payment"
        );
        Ok(record)
    }

    /// A user's payments, oldest first.
    pub async fn history(&self, username: &Username) -> Result<Vec<PaymentRecord>> {
        self.payments.for_user(username).await
    }

    pub async fn all(&self) -> Result<Vec<PaymentRecord>> {
        self.payments.all_payments().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryPaymentStore;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_record_appends_without_user_check() {
        let ledger = Ledger::new(Box::new(InMemoryPaymentStore::new()));
        let ghost = Username::new("nobody").unwrap();

        let record = ledger
            .record(&ghost, Amount::new(dec!(4.20)).unwrap(), PaymentMethod::Card)
            .await
            .unwrap();

        assert_eq!(record.username, ghost);
        assert_eq!(ledger.history(&ghost).await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_history_is_per_user_and_ordered() {
        let ledger = Ledger::new(Box::new(InMemoryPaymentStore::new()));
        let alice = Username::new("alice").unwrap();
        let bob = Username::new("bob").unwrap();

        for (user, amount) in [(&alice, dec!(1)), (&bob, dec!(2)), (&alice, dec!(3))] {
            ledger
                .record(user, Amount::new(amount).unwrap(), PaymentMethod::Wallet)
                .await
                .unwrap();
        }

        let amounts: Vec<_> = ledger
            .history(&alice)
            .await
            .unwrap()
            .iter()
            .map(|p| p.amount.value())
            .collect();
        assert_eq!(amounts, vec![dec!(1), dec!(3)]);
        assert_eq!(ledger.all().await.unwrap().len(), 3);
    }
}
