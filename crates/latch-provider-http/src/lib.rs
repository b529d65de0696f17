//! HTTP/JSON identity provider for Latch.
//!
//! Implements [`latch_core::provider::IdentityProvider`] by posting profile
//! patches to the provider's account API. Sign-in and token issuance happen
//! elsewhere; this crate only needs an already-issued API token.

mod client;

pub mod error;

pub use client::{HttpIdentityProvider, ProviderConfig};
pub use error::{Error, Result};
