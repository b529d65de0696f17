//! Core types and the session store for Latch.
//!
//! This crate holds no HTTP or database dependencies. The identity provider
//! and the durable snapshot backend are reached through the traits in
//! [`provider`] and [`snapshot`]; concrete implementations live in sibling
//! crates.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod principal;
pub mod provider;
pub mod session;
pub mod snapshot;
pub mod state;

pub use error::{Error, Result};
pub use session::{ProfileUpdate, SessionStore, Subscription};
