//! CLI argument parsing for the sinkhound daemon.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use thiserror::Error;

use sinkhound_stats::classify::{
    Thresholds, DEFAULT_COUNT_THRESHOLD, DEFAULT_ENTROPY_THRESHOLD, DEFAULT_TTL_THRESHOLD,
};

/// Default telemetry source: the IDS sensor's EVE log.
pub const DEFAULT_TELEMETRY_PATH: &str = "/var/log/suricata/eve.json";

/// Default published policy path, picked up by unbound's include glob.
pub const DEFAULT_POLICY_PATH: &str = "/etc/unbound/unbound.conf.d/sinkhole.conf";

/// Default seconds between cycles.
pub const DEFAULT_INTERVAL_SEC: u64 = 300;

/// Default resolver reload command.
pub const DEFAULT_RELOAD_CMD: &str = "systemctl reload unbound";

/// Default timeout for the reload command in seconds.
pub const DEFAULT_RELOAD_TIMEOUT_SEC: u64 = 30;

/// Errors from CLI argument validation.
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("interval-sec must be at least 1, got {0}")]
    InvalidInterval(u64),

    #[error("entropy-threshold must be a finite non-negative number, got {0}")]
    InvalidEntropyThreshold(f64),

    #[error("ttl-threshold must be a finite non-negative number, got {0}")]
    InvalidTtlThreshold(f64),

    #[error("reload-timeout-sec must be at least 1, got {0}")]
    InvalidReloadTimeout(u64),

    #[error("reload-cmd must not be empty")]
    EmptyReloadCommand,
}

/// Passive DNS behavioral sinkhole daemon.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "sinkhound")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v per-cycle detail, -vv per-line detail).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the classify-and-publish loop until interrupted.
    Run(RunArgs),
    /// Run exactly one ingest-classify-publish cycle, then exit.
    Once(RunArgs),
}

/// Arguments shared by the run and once commands.
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Path to the sensor's newline-delimited JSON event log.
    #[arg(long, default_value = DEFAULT_TELEMETRY_PATH)]
    pub telemetry: PathBuf,

    /// Path of the sinkhole zone file to publish.
    #[arg(long, default_value = DEFAULT_POLICY_PATH)]
    pub policy: PathBuf,

    /// Query count a domain must exceed before any verdict.
    #[arg(long, default_value_t = DEFAULT_COUNT_THRESHOLD)]
    pub count_threshold: u64,

    /// Name entropy in bits above which a domain counts as random-looking.
    #[arg(long, default_value_t = DEFAULT_ENTROPY_THRESHOLD)]
    pub entropy_threshold: f64,

    /// Average answer TTL in seconds below which a domain counts as
    /// fast-flux.
    #[arg(long, default_value_t = DEFAULT_TTL_THRESHOLD)]
    pub ttl_threshold: f64,

    /// Seconds to sleep between cycles.
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SEC)]
    pub interval_sec: u64,

    /// Whitelist file (one domain per line, # comments). Replaces the
    /// built-in defaults.
    #[arg(long)]
    pub whitelist: Option<PathBuf>,

    /// Resolver reload command, run after each successful publish.
    #[arg(long, default_value = DEFAULT_RELOAD_CMD)]
    pub reload_cmd: String,

    /// Seconds to wait for the reload command before killing it.
    #[arg(long, default_value_t = DEFAULT_RELOAD_TIMEOUT_SEC)]
    pub reload_timeout_sec: u64,
}

impl RunArgs {
    /// Validate the arguments.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.interval_sec == 0 {
            return Err(CliError::InvalidInterval(self.interval_sec));
        }
        if !self.entropy_threshold.is_finite() || self.entropy_threshold < 0.0 {
            return Err(CliError::InvalidEntropyThreshold(self.entropy_threshold));
        }
        if !self.ttl_threshold.is_finite() || self.ttl_threshold < 0.0 {
            return Err(CliError::InvalidTtlThreshold(self.ttl_threshold));
        }
        if self.reload_timeout_sec == 0 {
            return Err(CliError::InvalidReloadTimeout(self.reload_timeout_sec));
        }
        if self.reload_cmd.split_whitespace().next().is_none() {
            return Err(CliError::EmptyReloadCommand);
        }
        Ok(())
    }

    /// Classification thresholds from the parsed arguments.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            count: self.count_threshold,
            entropy: self.entropy_threshold,
            ttl: self.ttl_threshold,
        }
    }
}
