//! Presentation layer: the interactive shell and ledger export.

pub mod export;
pub mod shell;
