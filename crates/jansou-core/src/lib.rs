//! Core types, settlement arithmetic and trait definitions for Jansou.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`store::LedgerStore`]; [`ledger::Ledger`] drives them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod ledger;
pub mod ranking;
pub mod roster;
pub mod round;
pub mod session;
pub mod settle;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
