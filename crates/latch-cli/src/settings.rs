//! Runtime settings, read from an optional TOML file and `LATCH_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use latch_provider_http::ProviderConfig;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "~/.local/share/latch/session.db";

/// Shape of `latch.toml`.
///
/// ```toml
/// store_path = "~/.local/share/latch/session.db"
///
/// [provider]
/// base_url     = "https://id.example.com"
/// api_token    = "…"
/// timeout_secs = 10
/// ```
///
/// Nested keys can be overridden from the environment with a double
/// underscore, e.g. `LATCH_PROVIDER__BASE_URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub store_path: PathBuf,
  /// Without a provider, profile updates are kept local.
  #[serde(default)]
  pub provider:   Option<ProviderConfig>,
}

impl Settings {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("LATCH").separator("__"))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
