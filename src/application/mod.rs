//! Application layer containing the storefront's business logic.
//!
//! `CredentialStore` and `Ledger` wrap the storage ports; `SessionController`
//! composes them with a payment gateway and tracks the logged-in user.

pub mod credentials;
pub mod ledger;
pub mod session;
