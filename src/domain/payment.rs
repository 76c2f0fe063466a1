use crate::domain::user::Username;
use crate::error::{Result, StorefrontError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a positive monetary amount for payments.
///
/// Zero and negative values cannot be constructed, so anything holding an
/// `Amount` can be recorded without further checks.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(StorefrontError::InvalidAmount(format!(
                "{value} is not a positive amount"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = StorefrontError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str_exact(s.trim())
            .map_err(|_| StorefrontError::InvalidAmount(format!("{s:?} is not a number")))?;
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// The closed set of payment methods a user can pay with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Wallet,
}

/// What a processor reports for one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub approved: bool,
    /// User-facing line emitted by the processor, if it produced one.
    pub announcement: Option<String>,
}

impl PaymentMethod {
    /// Runs the simulator bound to this method.
    ///
    /// Neither simulator moves money; both announce the action and approve.
    pub fn process(self, amount: Amount) -> Processed {
        match self {
            Self::Card => process_card(amount),
            Self::Wallet => process_wallet(amount),
        }
    }

    /// The line shown to the user while the payment runs.
    pub fn announcement(self, amount: Amount) -> String {
        format!("Processing {} payment of ${amount}...", self.label())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Card => "credit card",
            Self::Wallet => "PayPal",
        }
    }

    /// Token persisted in the ledger.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Wallet => "wallet",
        }
    }
}

fn process_card(amount: Amount) -> Processed {
    tracing::info!(%amount, "processing credit card payment");
    Processed {
        approved: true,
        announcement: Some(PaymentMethod::Card.announcement(amount)),
    }
}

fn process_wallet(amount: Amount) -> Processed {
    tracing::info!(%amount, "processing wallet payment");
    Processed {
        approved: true,
        announcement: Some(PaymentMethod::Wallet.announcement(amount)),
    }
}

impl FromStr for PaymentMethod {
    type Err = StorefrontError;

    /// Accepts `card`, `wallet`, and the legacy `paypal` token.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "wallet" | "paypal" => Ok(Self::Wallet),
            _ => Err(StorefrontError::UnrecognizedPaymentMethod(s.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed payment. Append-only: never updated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub username: Username,
    pub amount: Amount,
    pub method: PaymentMethod,
}
