//! [`SessionStore`] — the single writable copy of the session state.
//!
//! Every mutation commits a whole [`SessionState`] and then notifies
//! subscribers synchronously with the committed snapshot. Commits from
//! different threads are serialised from mutation through notification, so
//! every subscriber sees snapshots in commit order. The state lock itself is
//! released before callbacks run and no lock is held while a remote call is
//! pending, so callbacks may read [`SessionStore::state`] freely.

use std::sync::{
  Arc, Weak,
  atomic::{AtomicU64, Ordering},
};

use parking_lot::{Mutex, ReentrantMutex};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
  principal::{Principal, ProfilePatch, Role},
  provider::IdentityProvider,
  state::SessionState,
};

// ─── Subscriptions ───────────────────────────────────────────────────────────

type Callback = Arc<dyn Fn(&SessionState) + Send + Sync>;

struct Subscriber {
  id:       u64,
  callback: Callback,
}

type Registry = Mutex<Vec<Subscriber>>;

/// Handle returned by [`SessionStore::subscribe`].
///
/// Dropping the handle does not unsubscribe; call
/// [`Subscription::unsubscribe`] to stop receiving notifications.
pub struct Subscription {
  id:       u64,
  registry: Weak<Registry>,
}

impl Subscription {
  /// Remove the callback. A no-op if the store has already been dropped.
  pub fn unsubscribe(self) {
    if let Some(registry) = self.registry.upgrade() {
      registry.lock().retain(|s| s.id != self.id);
    }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of a profile update that found a signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
  /// The principal as committed to local state.
  pub principal:  Principal,
  /// `true` when the identity provider did not accept the patch: the call
  /// failed, the provider is offline, or the principal is a mock.
  pub local_only: bool,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Holds the current `(user, role)` pair and mediates profile updates with
/// the identity provider `P`.
///
/// Constructed explicitly and shared by reference (or `Arc`); there is no
/// process-wide instance.
pub struct SessionStore<P> {
  provider:    P,
  state:       Mutex<SessionState>,
  subscribers: Arc<Registry>,
  next_id:     AtomicU64,
  /// Held by a commit from mutation until its last callback returns.
  /// Reentrant so a callback that commits on the same thread does not
  /// deadlock.
  delivery:    ReentrantMutex<()>,
}

impl<P: IdentityProvider> SessionStore<P> {
  /// A signed-out store.
  pub fn new(provider: P) -> Self { Self::with_state(provider, SessionState::empty()) }

  /// A store hydrated from a previously persisted snapshot. Nobody is
  /// notified; there are no subscribers yet.
  pub fn with_state(provider: P, state: SessionState) -> Self {
    Self {
      provider,
      state: Mutex::new(state),
      subscribers: Arc::new(Mutex::new(Vec::new())),
      next_id: AtomicU64::new(0),
      delivery: ReentrantMutex::new(()),
    }
  }

  pub fn provider(&self) -> &P { &self.provider }

  /// The latest committed state.
  pub fn state(&self) -> SessionState { self.state.lock().clone() }

  /// Register `callback` to run after every state transition.
  pub fn subscribe<F>(&self, callback: F) -> Subscription
  where
    F: Fn(&SessionState) + Send + Sync + 'static,
  {
    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
    self.subscribers.lock().push(Subscriber {
      id,
      callback: Arc::new(callback),
    });
    Subscription {
      id,
      registry: Arc::downgrade(&self.subscribers),
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Replace the session with `(principal, role)`.
  pub fn set_user(&self, principal: Principal, role: Role) {
    debug!(principal_id = %principal.id, %role, "session set");
    self.commit(|state| *state = SessionState::signed_in(principal, role));
  }

  /// Clear the session after a real sign-out.
  pub fn logout(&self) {
    debug!("session cleared by logout");
    self.commit(|state| *state = SessionState::empty());
  }

  /// Clear a mock session. Same effect as [`Self::logout`], kept separate so
  /// logout-only side effects never run during mock teardown.
  pub fn clear_mock_user(&self) {
    debug!("mock session cleared");
    self.commit(|state| *state = SessionState::empty());
  }

  /// Apply `patch` to the signed-in principal and forward it to the
  /// identity provider.
  ///
  /// The local change is committed whether or not the provider accepts it;
  /// a provider failure is logged and reported only through
  /// [`ProfileUpdate::local_only`]. Returns `None` without notifying anyone
  /// when no principal is signed in.
  ///
  /// The commit is made against the state current when the provider call
  /// returns. If the same principal is still signed in, the patch fields are
  /// overlaid onto it, so concurrent updates to other fields survive and the
  /// last commit wins on shared fields. If the session was cleared or
  /// replaced meanwhile, the principal computed at call start is written
  /// back with its original role.
  pub async fn update_profile(&self, patch: ProfilePatch) -> Option<ProfileUpdate> {
    let (current, role) = self
      .state
      .lock()
      .session()
      .map(|s| (s.principal.clone(), s.role))?;

    let candidate = current.patched(&patch);

    let local_only = if current.mock {
      debug!(principal_id = %current.id, "mock principal, skipping remote profile update");
      true
    } else if self.provider.is_offline() {
      debug!(principal_id = %current.id, "identity provider offline, keeping profile update local");
      true
    } else {
      match self.provider.update_remote_profile(&current, &patch).await {
        Ok(()) => false,
        Err(error) => {
          warn!(
            principal_id = %current.id,
            %error,
            "remote profile update failed, keeping local change"
          );
          true
        }
      }
    };

    let principal = self.commit(|state| match state.session_mut() {
      Some(session) if session.principal.id == candidate.id => {
        session.principal = session.principal.patched(&patch);
        session.principal.clone()
      }
      _ => {
        warn!(
          principal_id = %candidate.id,
          "session changed while a profile update was pending, restoring it"
        );
        *state = SessionState::signed_in(candidate.clone(), role);
        candidate
      }
    });

    Some(ProfileUpdate {
      principal,
      local_only,
    })
  }

  // ── Internals ─────────────────────────────────────────────────────────

  /// Apply `mutate` under the state lock, then notify every subscriber with
  /// the resulting snapshot once the lock is released. The delivery lock
  /// spans both steps so concurrent commits cannot reorder notifications.
  fn commit<T>(&self, mutate: impl FnOnce(&mut SessionState) -> T) -> T {
    let _delivery = self.delivery.lock();

    let (out, snapshot) = {
      let mut state = self.state.lock();
      let out = mutate(&mut state);
      (out, state.clone())
    };

    let callbacks: Vec<Callback> = self
      .subscribers
      .lock()
      .iter()
      .map(|s| Arc::clone(&s.callback))
      .collect();
    for callback in callbacks {
      callback(&snapshot);
    }

    out
  }
}
