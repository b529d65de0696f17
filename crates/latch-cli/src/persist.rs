//! Keeps a [`SnapshotStore`] in step with a [`SessionStore`].
//!
//! Subscriber callbacks are synchronous, so each committed state is handed
//! to a background task over a channel and written from there, in commit
//! order.

use latch_core::{
  SessionStore, Subscription, provider::IdentityProvider, snapshot::SnapshotStore,
  state::SessionState,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

pub struct Persister {
  subscription: Subscription,
  task:         JoinHandle<usize>,
}

/// Subscribe `snapshots` to every transition of `session`.
pub fn attach<P, S>(session: &SessionStore<P>, snapshots: S) -> Persister
where
  P: IdentityProvider,
  S: SnapshotStore + 'static,
{
  let (tx, mut rx) = mpsc::unbounded_channel::<SessionState>();
  let subscription = session.subscribe(move |state| {
    // The receiver only goes away after `finish` has unsubscribed.
    let _ = tx.send(state.clone());
  });

  let task = tokio::spawn(async move {
    let mut saved = 0;
    while let Some(state) = rx.recv().await {
      match snapshots.save(&state).await {
        Ok(()) => saved += 1,
        Err(error) => warn!(%error, "failed to save session snapshot"),
      }
    }
    saved
  });

  Persister { subscription, task }
}

impl Persister {
  /// Stop listening and wait for queued snapshots to be written. Returns the
  /// number of snapshots saved.
  pub async fn finish(self) -> anyhow::Result<usize> {
    self.subscription.unsubscribe();
    Ok(self.task.await?)
  }
}
