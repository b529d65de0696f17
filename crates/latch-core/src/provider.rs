//! The `IdentityProvider` trait — the remote side of a profile update.
//!
//! Sign-in, sign-out and token refresh belong to the provider's own SDK and
//! are not modelled here. The store only needs to forward profile patches.

use std::future::Future;

use crate::principal::{Principal, ProfilePatch};

/// Remote identity provider that owns the canonical account record.
///
/// All methods return `Send` futures so a store can be shared across tasks
/// of a multi-threaded runtime.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `patch` against the remote account of `principal`.
  ///
  /// A failure here never reaches the caller of
  /// [`SessionStore::update_profile`](crate::SessionStore::update_profile);
  /// it only marks the update as local-only.
  fn update_remote_profile<'a>(
    &'a self,
    principal: &'a Principal,
    patch: &'a ProfilePatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Whether this provider is deliberately running without a remote. An
  /// offline provider is never called; updates are committed as local-only
  /// without being treated as failures.
  fn is_offline(&self) -> bool { false }
}

/// Provider for sessions that never talk to a remote account, such as
/// offline demos. Every update succeeds without doing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProvider;

impl IdentityProvider for NoopProvider {
  type Error = std::convert::Infallible;

  async fn update_remote_profile(
    &self,
    _: &Principal,
    _: &ProfilePatch,
  ) -> Result<(), Self::Error> {
    Ok(())
  }
}
