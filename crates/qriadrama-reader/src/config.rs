//! Command line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use qriadrama_playback::config::PlaybackConfig;

use crate::error::AppError;

/// Read Qriadrama scripts in the terminal.
#[derive(Debug, Parser)]
#[command(name = "qriadrama", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding one sub-directory per script
    #[arg(long, env = "QRIADRAMA_DATA_DIR", default_value = "./data", global = true)]
    pub data_dir: PathBuf,

    /// Milliseconds between revealed characters
    #[arg(
        long,
        env = "QRIADRAMA_TYPING_SPEED_MS",
        default_value_t = 50,
        global = true
    )]
    pub typing_speed_ms: u64,

    /// Clear the screen after this many lines
    #[arg(long, env = "QRIADRAMA_HISTORY_LIMIT", global = true)]
    pub history_limit: Option<usize>,

    /// Log output format (logs go to stderr)
    #[arg(
        long,
        env = "QRIADRAMA_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty,
        global = true
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the scripts in the data directory
    List,
    /// Play a script
    Read {
        /// Script title (its directory name)
        title: String,

        /// Chapter file to play instead of the script's index
        #[arg(long, value_name = "FILE")]
        chapter: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Cli {
    /// The playback settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the typing speed is zero.
    pub fn playback_config(&self) -> Result<PlaybackConfig, AppError> {
        if self.typing_speed_ms == 0 {
            return Err(AppError::Config(
                "QRIADRAMA_TYPING_SPEED_MS must be greater than zero".to_owned(),
            ));
        }
        Ok(PlaybackConfig::new(Duration::from_millis(
            self.typing_speed_ms,
        )))
    }

    /// Lines kept on screen before it is cleared, if limited.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the limit is zero.
    pub fn history_limit(&self) -> Result<Option<usize>, AppError> {
        match self.history_limit {
            Some(0) => Err(AppError::Config(
                "QRIADRAMA_HISTORY_LIMIT must be greater than zero".to_owned(),
            )),
            limit => Ok(limit),
        }
    }
}
