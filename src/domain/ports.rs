use super::payment::{Amount, PaymentMethod, PaymentRecord, Processed};
use super::user::{PasswordDigest, UserRecord, Username};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. Fails with `DuplicateUsername` if the name is taken,
    /// leaving the existing record untouched.
    async fn create(&self, username: &Username, digest: &PasswordDigest) -> Result<UserRecord>;
    async fn find(&self, username: &Username) -> Result<Option<UserRecord>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn append(
        &self,
        username: &Username,
        amount: Amount,
        method: PaymentMethod,
    ) -> Result<PaymentRecord>;
    async fn for_user(&self, username: &Username) -> Result<Vec<PaymentRecord>>;
    async fn all_payments(&self) -> Result<Vec<PaymentRecord>>;
}

/// Seam for the processor that actually moves money.
///
/// `approved: false` means the processor declined the payment.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process(&self, method: PaymentMethod, amount: Amount) -> Result<Processed>;
}

pub type UserStoreBox = Box<dyn UserStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;

/// Runs the simulator bound to each payment method.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn process(&self, method: PaymentMethod, amount: Amount) -> Result<Processed> {
        Ok(method.process(amount))
    }
}
