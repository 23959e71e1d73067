//! Reader commands.

use std::io::{self, Write};
use std::sync::Arc;

use qriadrama_content::FsScriptProvider;
use qriadrama_core::clock::SystemClock;
use qriadrama_core::provider::ScriptProvider;
use qriadrama_core::script::Script;
use qriadrama_playback::application::loader::load_script;
use qriadrama_playback::application::player::Player;
use qriadrama_playback::config::PlaybackConfig;
use qriadrama_playback::domain::session::{ScriptSession, SessionSummary};
use qriadrama_playback::error::PlaybackError;
use tracing::info;

use crate::config::{Cli, Command};
use crate::error::AppError;
use crate::input::{RawModeGuard, spawn_key_reader};
use crate::presenter::{HistoryPolicy, TerminalPresenter};

/// Runs the command named on the command line.
///
/// # Errors
///
/// Returns `AppError` if the configuration is invalid, the data cannot be
/// loaded, or the terminal fails.
pub async fn run(cli: &Cli) -> Result<(), AppError> {
    let provider = FsScriptProvider::new(&cli.data_dir);
    match &cli.command {
        Command::List => {
            let target = cli.data_dir.display().to_string();
            list(&provider, &target, &mut io::stdout().lock()).await
        }
        Command::Read { title, chapter } => {
            let config = cli.playback_config()?;
            let history = HistoryPolicy::from(cli.history_limit()?);
            let script = load(&provider, title, chapter.as_deref()).await?;
            let summary = play(script, &config, history).await?;
            info!(
                session_id = %summary.session_id,
                lines_shown = summary.lines_shown,
                finished = summary.finished_at.is_some(),
                "reading ended"
            );
            Ok(())
        }
    }
}

/// Prints the catalog, one title per line with its description indented
/// below it.
///
/// # Errors
///
/// Returns `AppError::Provider` if the catalog cannot be read and
/// `AppError::Io` if writing fails.
pub async fn list(
    provider: &dyn ScriptProvider,
    target: &str,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let catalog = provider
        .fetch_catalog()
        .await
        .map_err(|error| AppError::Provider {
            target: target.to_owned(),
            source: PlaybackError::from(error),
        })?;
    if catalog.is_empty() {
        writeln!(out, "no scripts found")?;
    }
    for entry in catalog {
        writeln!(out, "{}", entry.title)?;
        if let Some(description) = entry.description {
            writeln!(out, "    {description}")?;
        }
    }
    Ok(())
}

/// Loads a script for reading.
///
/// # Errors
///
/// Returns `AppError::Provider` naming `title` if the provider fails.
pub async fn load(
    provider: &dyn ScriptProvider,
    title: &str,
    chapter: Option<&str>,
) -> Result<Script, AppError> {
    load_script(provider, title, chapter)
        .await
        .map_err(|source| AppError::Provider {
            target: title.to_owned(),
            source,
        })
}

async fn play(
    script: Script,
    config: &PlaybackConfig,
    history: HistoryPolicy,
) -> Result<SessionSummary, AppError> {
    let _raw = RawModeGuard::enable()?;
    let player = Player::new();
    let keys = spawn_key_reader(player.handle());
    let session = ScriptSession::start(
        script,
        TerminalPresenter::new(io::stdout(), history),
        player.scheduler(),
        Arc::new(SystemClock),
        config,
    );
    let summary = player.run(session).await;
    keys.await.map_err(io::Error::other)??;
    Ok(summary)
}
