//! Async HTTP client for the identity provider's account API.

use std::time::Duration;

use latch_core::{
  principal::{Principal, ProfilePatch},
  provider::IdentityProvider,
};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

fn default_timeout_secs() -> u64 { 10 }

/// Connection settings for the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
  /// Root of the account API, e.g. `https://id.example.com`.
  pub base_url:     String,
  /// Sent as a bearer token when present.
  #[serde(default)]
  pub api_token:    Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

/// Wire shape of a profile patch. Absent fields are left out entirely.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileBody<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  display_name: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  photo_url:    Option<&'a str>,
}

/// Identity provider reached over HTTP.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpIdentityProvider {
  client:    Client,
  base_url:  Url,
  api_token: Option<String>,
}

impl HttpIdentityProvider {
  pub fn new(config: ProviderConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| Error::InvalidConfig(format!("base_url {:?}: {e}", config.base_url)))?;
    if base_url.cannot_be_a_base() {
      return Err(Error::InvalidConfig(format!(
        "base_url {:?} cannot carry a path",
        config.base_url
      )));
    }

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;

    Ok(Self {
      client,
      base_url,
      api_token: config.api_token,
    })
  }

  /// `{base_url}/v1/accounts/{id}/profile`, with `id` percent-encoded as a
  /// single path segment.
  pub fn profile_url(&self, principal: &Principal) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|()| Error::InvalidConfig("base_url cannot carry a path".into()))?
      .pop_if_empty()
      .extend(["v1", "accounts", principal.id.as_str(), "profile"]);
    Ok(url)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.api_token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }
}

impl IdentityProvider for HttpIdentityProvider {
  type Error = Error;

  /// `POST /v1/accounts/{id}/profile`
  async fn update_remote_profile(
    &self,
    principal: &Principal,
    patch: &ProfilePatch,
  ) -> Result<()> {
    let url = self.profile_url(principal)?;
    let body = ProfileBody {
      display_name: patch.display_name.as_deref(),
      photo_url:    patch.photo_url.as_deref(),
    };

    let resp = self
      .auth(self.client.post(url))
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      debug!(principal_id = %principal.id, %status, "profile update rejected");
      return Err(Error::Status(status.as_u16()));
    }
    Ok(())
  }
}
