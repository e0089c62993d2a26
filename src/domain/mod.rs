//! Domain types and rules for dynamic payment codes.
//!
//! Nothing in here performs I/O; external capabilities are described by the
//! traits in [`ports`].

pub mod amount;
pub mod checksum;
pub mod ledger;
pub mod payload;
pub mod ports;
pub mod transaction;
