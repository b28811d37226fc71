//! Configuration file support for gesture-dispatch.
//!
//! Configuration is loaded from `~/.config/gesture-dispatch/config.toml` with the following precedence:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.config/gesture-dispatch/config.toml
//! preset = "compact"
//!
//! [reader]
//! command = "/usr/local/bin/event-reader"
//!
//! [sink]
//! command = "xdotool"
//! args = ["-"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::table::Preset;

const DEFAULT_READER: &str = "./event-reader";
const DEFAULT_SINK: &str = "xdotool";
const PRESET_ENV: &str = "GESTURE_DISPATCH_PRESET";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Action table preset
    pub preset: Option<Preset>,

    /// Event source process
    pub reader: Option<CommandSpec>,

    /// Input synthesis process
    pub sink: Option<CommandSpec>,
}

/// A child process invocation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandSpec {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(command: &str, args: &[&str]) -> Self {
        Self {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Command line for log and error messages
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

impl Config {
    /// Build the configuration the binary runs with: file values first, then
    /// `GESTURE_DISPATCH_PRESET` on top. CLI flags go through `with_overrides`.
    ///
    /// A missing file means defaults. An unreadable or invalid one is reported
    /// on stderr and also falls back to defaults.
    pub fn load() -> Self {
        let path = Self::config_path();
        let config = match Self::read(&path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                eprintln!("Warning: ignoring {}: {:#}", path.display(), e);
                Self::default()
            }
        };
        config.with_env_preset(std::env::var(PRESET_ENV).ok())
    }

    fn read(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).context("reading config file")?;
        let config = toml::from_str(&contents).context("parsing config file")?;
        Ok(Some(config))
    }

    /// `<config_dir>/gesture-dispatch/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gesture-dispatch")
            .join("config.toml")
    }

    /// Apply a preset name taken from the environment over the file value.
    fn with_env_preset(mut self, value: Option<String>) -> Self {
        match value.as_deref().map(str::parse::<Preset>) {
            Some(Ok(preset)) => self.preset = Some(preset),
            Some(Err(e)) => eprintln!("Warning: {}: {}", PRESET_ENV, e),
            None => {}
        }
        self
    }

    /// Merge with CLI overrides.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn with_overrides(
        mut self,
        preset: Option<Preset>,
        reader: Option<String>,
        sink: Option<String>,
    ) -> Self {
        if preset.is_some() {
            self.preset = preset;
        }
        if let Some(command) = reader {
            self.reader = Some(CommandSpec::new(&command, &[]));
        }
        if let Some(command) = sink {
            // A bare sink path still reads its script from stdin
            self.sink = Some(CommandSpec::new(&command, &["-"]));
        }
        self
    }

    pub fn preset(&self) -> Preset {
        self.preset.unwrap_or_default()
    }

    pub fn reader(&self) -> CommandSpec {
        self.reader
            .clone()
            .unwrap_or_else(|| CommandSpec::new(DEFAULT_READER, &[]))
    }

    pub fn sink(&self) -> CommandSpec {
        self.sink
            .clone()
            .unwrap_or_else(|| CommandSpec::new(DEFAULT_SINK, &["-"]))
    }
}
