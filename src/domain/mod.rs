//! Domain layer: value types, records and the ports the application talks to.

pub mod payment;
pub mod ports;
pub mod user;
