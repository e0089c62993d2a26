//! Dynamic QRIS payment codes.
//!
//! Takes a static merchant payload and an amount, rewrites the payload into a
//! dynamic one with a fresh checksum, renders it as a matrix code with the
//! brand mark in the middle, publishes the image and returns the transaction
//! record.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod imaging;
pub mod infrastructure;
pub mod interfaces;
