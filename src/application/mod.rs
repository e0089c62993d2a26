//! Application layer orchestrating the domain rules and the injected ports.
//!
//! `PaymentEngine` turns a static payload and an amount into a published
//! payment code. `LedgerService` answers read-only questions about the
//! merchant's mutation log.

pub mod engine;
pub mod ledger;
