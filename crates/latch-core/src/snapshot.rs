//! The `SnapshotStore` trait — durable copies of the session state.
//!
//! The [`SessionStore`](crate::SessionStore) itself never persists anything.
//! Callers hydrate it from a snapshot on startup and keep the snapshot current
//! by subscribing to state transitions.

use std::future::Future;

use crate::state::SessionState;

/// Abstraction over a durable snapshot backend (e.g. `latch-store-sqlite`).
pub trait SnapshotStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the last saved state. A backend with nothing saved yields
  /// [`SessionState::empty`].
  fn load(
    &self,
  ) -> impl Future<Output = Result<SessionState, Self::Error>> + Send + '_;

  /// Replace the saved state with `state`.
  fn save<'a>(
    &'a self,
    state: &'a SessionState,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Drop any saved state.
  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
