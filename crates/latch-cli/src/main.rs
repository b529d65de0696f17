//! `latch` — command-line front end for the Latch session store.
//!
//! Each invocation hydrates the session from the SQLite snapshot, runs one
//! command, and writes every resulting transition back before exiting.
//!
//! # Usage
//!
//! ```
//! latch login --id uid-123 --email a@x.com --display-name A --role admin
//! latch update-profile --display-name B
//! latch whoami
//! latch logout
//! ```

mod persist;
mod provider;
mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use latch_core::{
  SessionStore,
  principal::{Principal, PrincipalId, ProfilePatch, Role},
  snapshot::SnapshotStore,
};
use latch_store_sqlite::SqliteSnapshotStore;
use provider::Provider;
use serde::Serialize;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Client-held authentication session store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "latch.toml", env = "LATCH_CONFIG")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Store a principal issued by the identity provider.
  Login {
    #[arg(long)]
    id:           String,
    #[arg(long)]
    email:        Option<String>,
    #[arg(long)]
    display_name: Option<String>,
    #[arg(long)]
    photo_url:    Option<String>,
    #[arg(long, default_value = "user", value_parser = Role::parse)]
    role:         Role,
  },
  /// Start a local mock session that never reaches the identity provider.
  MockLogin {
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "user", value_parser = Role::parse)]
    role:  Role,
  },
  /// Print the current session as JSON.
  Whoami,
  /// Change the display name and/or photo of the signed-in principal.
  UpdateProfile {
    #[arg(long)]
    display_name: Option<String>,
    #[arg(long)]
    photo_url:    Option<String>,
  },
  /// Clear the session.
  Logout,
  /// Clear a mock session.
  ClearMock,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout carries command output.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  if let Some(parent) = settings.store_path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let snapshots = SqliteSnapshotStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  let provider = Provider::from_config(settings.provider)
    .context("failed to configure identity provider")?;
  let hydrated = snapshots
    .load()
    .await
    .context("failed to load session snapshot")?;

  let session = SessionStore::with_state(provider, hydrated);
  let persister = persist::attach(&session, snapshots);

  let result = run(cli.command, &session).await;

  let saved = persister.finish().await?;
  tracing::debug!(saved, "session snapshots flushed");

  result
}

async fn run(command: Command, session: &SessionStore<Provider>) -> anyhow::Result<()> {
  match command {
    Command::Login {
      id,
      email,
      display_name,
      photo_url,
      role,
    } => {
      let principal = Principal {
        id: PrincipalId::new(id)?,
        email,
        display_name,
        photo_url,
        mock: false,
      };
      session.set_user(principal, role);
      print_json(&session.state())
    }

    Command::MockLogin { email, role } => {
      session.set_user(Principal::mock(email), role);
      print_json(&session.state())
    }

    Command::Whoami => print_json(&session.state()),

    Command::UpdateProfile {
      display_name,
      photo_url,
    } => {
      let patch = ProfilePatch {
        display_name,
        photo_url,
      };
      if patch.is_empty() {
        bail!("nothing to update: pass --display-name and/or --photo-url");
      }
      match session.update_profile(patch).await {
        Some(outcome) => print_json(&outcome),
        None => bail!("not signed in"),
      }
    }

    Command::Logout => {
      session.logout();
      Ok(())
    }

    Command::ClearMock => {
      if session.state().user().is_some_and(|u| !u.mock) {
        bail!("the current session is not a mock session; use `latch logout`");
      }
      session.clear_mock_user();
      Ok(())
    }
  }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
