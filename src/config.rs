use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::data::export::DEFAULT_FILENAME;

/// Environment variable naming the source file when none is given on the
/// command line.
pub const SOURCE_ENV: &str = "RUSTY_SIEVE_SOURCE";

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Startup settings.
///
/// Layered lowest to highest: defaults, `--config <file.json>`,
/// `RUSTY_SIEVE_SOURCE`, `--export-dir <dir>`, positional source path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spreadsheet loaded at startup.
    pub source: Option<PathBuf>,
    /// Directory exported files are written into.
    pub export_dir: PathBuf,
    /// Filename used when the export dialog field is left blank.
    pub default_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            export_dir: PathBuf::from("."),
            default_filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl Config {
    /// Read a JSON config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Build the configuration from command-line arguments (without the
    /// program name) and the process environment.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        Self::from_args_and_env(args, std::env::var_os(SOURCE_ENV).map(PathBuf::from))
    }

    fn from_args_and_env<I>(args: I, env_source: Option<PathBuf>) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config_file = None;
        let mut export_dir = None;
        let mut source = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    config_file = Some(PathBuf::from(args.next().context("--config needs a path")?));
                }
                "--export-dir" => {
                    export_dir =
                        Some(PathBuf::from(args.next().context("--export-dir needs a path")?));
                }
                flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
                path => {
                    if source.is_some() {
                        bail!("Only one source file may be given");
                    }
                    source = Some(PathBuf::from(path));
                }
            }
        }

        let mut config = match config_file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        if let Some(env_source) = env_source {
            config.source = Some(env_source);
        }
        if let Some(dir) = export_dir {
            config.export_dir = dir;
        }
        if source.is_some() {
            config.source = source;
        }
        Ok(config)
    }
}
