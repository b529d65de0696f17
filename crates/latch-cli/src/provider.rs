//! Provider selection for the binary: HTTP when configured, otherwise offline.

use latch_core::{
  principal::{Principal, ProfilePatch},
  provider::IdentityProvider,
};
use latch_provider_http::{Error, HttpIdentityProvider, ProviderConfig};

/// The identity provider the CLI runs against.
pub enum Provider {
  Http(HttpIdentityProvider),
  /// No `[provider]` section: the store never calls out, so profile
  /// changes stay local-only.
  Offline,
}

impl Provider {
  pub fn from_config(config: Option<ProviderConfig>) -> latch_provider_http::Result<Self> {
    match config {
      Some(config) => Ok(Self::Http(HttpIdentityProvider::new(config)?)),
      None => Ok(Self::Offline),
    }
  }
}

impl IdentityProvider for Provider {
  type Error = Error;

  async fn update_remote_profile(
    &self,
    principal: &Principal,
    patch: &ProfilePatch,
  ) -> Result<(), Error> {
    match self {
      Self::Http(http) => http.update_remote_profile(principal, patch).await,
      Self::Offline => Err(Error::InvalidConfig(
        "no identity provider configured".into(),
      )),
    }
  }

  fn is_offline(&self) -> bool { matches!(self, Self::Offline) }
}
