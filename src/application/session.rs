use super::credentials::CredentialStore;
use super::ledger::Ledger;
use crate::domain::payment::{Amount, PaymentMethod, PaymentRecord};
use crate::domain::ports::{PaymentGatewayBox, PaymentStoreBox, SimulatedGateway, UserStoreBox};
use crate::domain::user::Username;
use crate::error::{Result, StorefrontError};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Who, if anyone, is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(Username),
}

/// Result of a `pay` request that did not fail outright.
///
/// `announcement` is whatever the processor reported while it ran.
#[derive(Debug, Clone, PartialEq)]
pub enum PayOutcome {
    /// The gateway accepted the payment and it is now in the ledger.
    Recorded {
        record: PaymentRecord,
        announcement: Option<String>,
    },
    /// The gateway refused; nothing was recorded.
    Declined {
        method: PaymentMethod,
        amount: Amount,
        announcement: Option<String>,
    },
    /// A zero amount ends the session.
    LoggedOut,
}

/// Drives a single user session over the credential store, the gateway and
/// the ledger.
///
/// The controller starts logged out. Registration never changes the session;
/// a successful login opens one; paying zero closes it.
pub struct SessionController {
    credentials: CredentialStore,
    ledger: Ledger,
    gateway: PaymentGatewayBox,
    session: Session,
}

impl SessionController {
    pub fn new(credentials: CredentialStore, ledger: Ledger, gateway: PaymentGatewayBox) -> Self {
        Self {
            credentials,
            ledger,
            gateway,
            session: Session::LoggedOut,
        }
    }

    /// Builds a controller over the given stores that pays through the
    /// simulators.
    pub fn with_stores(users: UserStoreBox, payments: PaymentStoreBox) -> Self {
        Self::new(
            CredentialStore::new(users),
            Ledger::new(payments),
            Box::new(SimulatedGateway),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&Username> {
        match &self.session {
            Session::LoggedIn(user) => Some(user),
            Session::LoggedOut => None,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<()> {
        if self.credentials.register(username, password).await? {
            Ok(())
        } else {
            Err(StorefrontError::DuplicateUsername)
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<Username> {
        if let Session::LoggedIn(current) = &self.session {
            return Err(StorefrontError::SessionActive(current.to_string()));
        }
        if !self.credentials.authenticate(username, password).await? {
            return Err(StorefrontError::InvalidCredentials);
        }
        let user = Username::new(username)?;
        tracing::info!(user = %user, "logged in");
        self.session = Session::LoggedIn(user.clone());
        Ok(user)
    }

    /// Ends the current session. Returns the user that was logged in.
    pub fn logout(&mut self) -> Option<Username> {
        match std::mem::take(&mut self.session) {
            Session::LoggedIn(user) => {
                tracing::info!(user = %user, "logged out");
                Some(user)
            }
            Session::LoggedOut => None,
        }
    }

    /// Pays `amount` with the method named by `method` on behalf of the
    /// logged-in user.
    ///
    /// A zero amount logs out without looking at `method`. Negative amounts
    /// and unknown methods are rejected and leave the session as it was.
    pub async fn pay(&mut self, amount: Decimal, method: &str) -> Result<PayOutcome> {
        let Session::LoggedIn(user) = &self.session else {
            return Err(StorefrontError::NotLoggedIn);
        };
        if amount.is_zero() {
            self.logout();
            return Ok(PayOutcome::LoggedOut);
        }
        let amount = Amount::new(amount)?;
        let method = PaymentMethod::from_str(method)?;

        let processed = self.gateway.process(method, amount).await?;
        if !processed.approved {
            tracing::warn!(user = %user, %amount, %method, "payment declined");
            return Ok(PayOutcome::Declined {
                method,
                amount,
                announcement: processed.announcement,
            });
        }
        let record = self.ledger.record(user, amount, method).await?;
        Ok(PayOutcome::Recorded {
            record,
            announcement: processed.announcement,
        })
    }

    /// The logged-in user's payments, oldest first.
    pub async fn history(&self) -> Result<Vec<PaymentRecord>> {
        let user = self.current_user().ok_or(StorefrontError::NotLoggedIn)?;
        self.ledger.history(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::Processed;
    use crate::domain::ports::PaymentGateway;
    use crate::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryUserStore};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct DecliningGateway;

    #[async_trait]
    impl PaymentGateway for DecliningGateway {
        async fn process(&self, _method: PaymentMethod, _amount: Amount) -> Result<Processed> {
            Ok(Processed {
                approved: false,
                announcement: None,
            })
        }
    }

    fn controller() -> SessionController {
        SessionController::with_stores(
            Box::new(InMemoryUserStore::new()),
            Box::new(InMemoryPaymentStore::new()),
        )
    }

    async fn logged_in_as_alice() -> SessionController {
        let mut controller = controller();
        controller.signup("alice", "pw1").await.unwrap();
        controller.login("alice", "pw1").await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_starts_logged_out() {
        let controller = controller();
        assert_eq!(controller.session(), &Session::LoggedOut);
        assert!(controller.current_user().is_none());
    }

    #[tokio::test]
    async fn test_signup_does_not_open_session() {
        let controller = controller();
        controller.signup("alice", "pw1").await.unwrap();
        assert_eq!(controller.session(), &Session::LoggedOut);

        let again = controller.signup("alice", "pw2").await;
        assert!(matches!(again, Err(StorefrontError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_login_failure_stays_logged_out() {
        let mut controller = controller();
        controller.signup("alice", "pw1").await.unwrap();

        let result = controller.login("alice", "wrong").await;
        assert!(matches!(result, Err(StorefrontError::InvalidCredentials)));
        assert_eq!(controller.session(), &Session::LoggedOut);
    }

    #[tokio::test]
    async fn test_login_while_logged_in_is_rejected() {
        let mut controller = logged_in_as_alice().await;
        controller.signup("bob", "pw").await.unwrap();

        let result = controller.login("bob", "pw").await;
        assert!(matches!(result, Err(StorefrontError::SessionActive(u)) if u == "alice"));
        assert_eq!(controller.current_user().unwrap().as_str(), "alice");
    }

    #[tokio::test]
    async fn test_pay_records_exactly_one_payment() {
        let mut controller = logged_in_as_alice().await;

        let outcome = controller.pay(dec!(19.99), "card").await.unwrap();
        let record = match outcome {
            PayOutcome::Recorded {
                record,
                announcement,
            } => {
                assert_eq!(
                    announcement.as_deref(),
                    Some("Processing credit card payment of $19.99...")
                );
                record
            }
            other => panic!("expected a recorded payment, got {other:?}"),
        };
        assert_eq!(record.username.as_str(), "alice");
        assert_eq!(record.amount.value(), dec!(19.99));
        assert_eq!(record.method, PaymentMethod::Card);

        assert_eq!(controller.history().await.unwrap(), vec![record]);
        assert!(controller.current_user().is_some());
    }

    #[tokio::test]
    async fn test_pay_zero_logs_out_without_record() {
        let mut controller = logged_in_as_alice().await;

        let outcome = controller.pay(Decimal::ZERO, "not-a-method").await.unwrap();
        assert_eq!(outcome, PayOutcome::LoggedOut);
        assert_eq!(controller.session(), &Session::LoggedOut);
        assert!(controller.ledger().all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_smallest_positive_amount_pays() {
        let mut controller = logged_in_as_alice().await;
        let tiny = Decimal::from_str_exact("0.0000000000000000000000000001").unwrap();

        let outcome = controller.pay(tiny, "card").await.unwrap();
        assert!(matches!(outcome, PayOutcome::Recorded { .. }));
        assert!(controller.current_user().is_some());
    }

    #[tokio::test]
    async fn test_unrecognized_method_keeps_session() {
        let mut controller = logged_in_as_alice().await;

        let result = controller.pay(dec!(5), "bitcoin").await;
        assert!(matches!(
            result,
            Err(StorefrontError::UnrecognizedPaymentMethod(_))
        ));
        assert_eq!(controller.current_user().unwrap().as_str(), "alice");
        assert!(controller.ledger().all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let mut controller = logged_in_as_alice().await;

        let result = controller.pay(dec!(-5), "card").await;
        assert!(matches!(result, Err(StorefrontError::InvalidAmount(_))));
        assert!(controller.current_user().is_some());
        assert!(controller.ledger().all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pay_requires_login() {
        let mut controller = controller();
        let result = controller.pay(dec!(5), "card").await;
        assert!(matches!(result, Err(StorefrontError::NotLoggedIn)));

        let result = controller.pay(Decimal::ZERO, "card").await;
        assert!(matches!(result, Err(StorefrontError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_declined_payment_is_not_recorded() {
        let mut controller = SessionController::new(
            CredentialStore::new(Box::new(InMemoryUserStore::new())),
            Ledger::new(Box::new(InMemoryPaymentStore::new())),
            Box::new(DecliningGateway),
        );
        controller.signup("alice", "pw1").await.unwrap();
        controller.login("alice", "pw1").await.unwrap();

        let outcome = controller.pay(dec!(10), "paypal").await.unwrap();
        assert_eq!(
            outcome,
            PayOutcome::Declined {
                method: PaymentMethod::Wallet,
                amount: Amount::new(dec!(10)).unwrap(),
                announcement: None,
            }
        );
        assert!(controller.current_user().is_some());
        assert!(controller.ledger().all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_returns_previous_user() {
        let mut controller = logged_in_as_alice().await;
        assert_eq!(controller.logout().unwrap().as_str(), "alice");
        assert!(controller.logout().is_none());
        assert!(matches!(
            controller.history().await,
            Err(StorefrontError::NotLoggedIn)
        ));
    }
}
