//! Principal and role — the identity half of a session.
//!
//! A principal is created by the identity provider on sign-in and handed to
//! the store as an immutable snapshot. Profile updates never mutate a
//! principal in place; they produce a new one via [`Principal::patched`].

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── PrincipalId ─────────────────────────────────────────────────────────────

/// Opaque account identifier assigned by the identity provider.
///
/// Guaranteed non-empty; the check runs on construction and on
/// deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
  pub fn new(id: impl Into<String>) -> Result<Self> {
    let id = id.into();
    if id.is_empty() {
      return Err(Error::EmptyPrincipalId);
    }
    Ok(Self(id))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for PrincipalId {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::new(value) }
}

impl From<PrincipalId> for String {
  fn from(id: PrincipalId) -> Self { id.0 }
}

impl AsRef<str> for PrincipalId {
  fn as_ref(&self) -> &str { &self.0 }
}

impl fmt::Display for PrincipalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Role ────────────────────────────────────────────────────────────────────

/// Authorization label attached to a signed-in principal.
///
/// There is no "unset" variant: a session without a role is represented by
/// the absence of the whole session (see [`crate::state::SessionState`]).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

impl Role {
  /// Parse the lowercase label (`"user"`, `"admin"`).
  pub fn parse(label: &str) -> Result<Self> {
    label
      .parse()
      .map_err(|_| Error::UnknownRole(label.to_owned()))
  }
}

// ─── Principal ───────────────────────────────────────────────────────────────

/// The signed-in identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
  pub id:           PrincipalId,
  pub email:        Option<String>,
  pub display_name: Option<String>,
  pub photo_url:    Option<String>,
  /// A locally fabricated principal with no account at the identity
  /// provider. Profile updates for it never leave the process.
  #[serde(default)]
  pub mock:         bool,
}

impl Principal {
  /// A provider-backed principal with every optional field empty.
  pub fn new(id: PrincipalId) -> Self {
    Self {
      id,
      email: None,
      display_name: None,
      photo_url: None,
      mock: false,
    }
  }

  /// A mock principal with a random id, used for demos and test sessions.
  pub fn mock(email: impl Into<String>) -> Self {
    Self {
      id:           PrincipalId(format!("mock-{}", Uuid::new_v4().simple())),
      email:        Some(email.into()),
      display_name: None,
      photo_url:    None,
      mock:         true,
    }
  }

  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = Some(email.into());
    self
  }

  pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
    self.display_name = Some(name.into());
    self
  }

  pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
    self.photo_url = Some(url.into());
    self
  }

  /// Return a copy of `self` with every field named by `patch` overlaid.
  pub fn patched(&self, patch: &ProfilePatch) -> Self {
    let mut next = self.clone();
    if let Some(name) = &patch.display_name {
      next.display_name = Some(name.clone());
    }
    if let Some(url) = &patch.photo_url {
      next.photo_url = Some(url.clone());
    }
    next
  }
}

// ─── ProfilePatch ────────────────────────────────────────────────────────────

/// The mutable subset of a [`Principal`]. `None` leaves a field untouched.
///
/// `id` and `email` are deliberately absent: they cannot change through a
/// profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
  pub display_name: Option<String>,
  pub photo_url:    Option<String>,
}

impl ProfilePatch {
  pub fn display_name(name: impl Into<String>) -> Self {
    Self {
      display_name: Some(name.into()),
      photo_url:    None,
    }
  }

  pub fn photo_url(url: impl Into<String>) -> Self {
    Self {
      display_name: None,
      photo_url:    Some(url.into()),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.display_name.is_none() && self.photo_url.is_none()
  }
}
