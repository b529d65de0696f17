//! The observable state of a [`crate::SessionStore`].

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  principal::{Principal, Role},
};

/// A signed-in principal together with its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub principal: Principal,
  pub role:      Role,
}

/// The `(user, role)` pair held by the store.
///
/// Both halves are present or both are absent; the pair is stored as a single
/// optional [`Session`] so a user without a role cannot be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState(Option<Session>);

impl SessionState {
  /// The signed-out state.
  pub fn empty() -> Self { Self(None) }

  pub fn signed_in(principal: Principal, role: Role) -> Self {
    Self(Some(Session { principal, role }))
  }

  pub fn user(&self) -> Option<&Principal> {
    self.0.as_ref().map(|s| &s.principal)
  }

  pub fn role(&self) -> Option<Role> { self.0.as_ref().map(|s| s.role) }

  pub fn session(&self) -> Option<&Session> { self.0.as_ref() }

  pub(crate) fn session_mut(&mut self) -> Option<&mut Session> {
    self.0.as_mut()
  }

  pub fn is_signed_in(&self) -> bool { self.0.is_some() }

  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn from_json(raw: &str) -> Result<Self> {
    Ok(serde_json::from_str(raw)?)
  }
}
