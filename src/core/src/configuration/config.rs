use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error_handling::types::ConfigError;

/// Command-line arguments.
///
/// Every setting is optional here: whatever is given on the command line
/// (or through its environment variable) overrides the configuration file,
/// which in turn overrides the built-in defaults.
///
/// # Examples
///
/// ```
/// use clap::Parser;
/// use shipyard::configuration::config::{CliArgs, Config};
///
/// let args = CliArgs::parse_from(["shipyard", "--port", "9000"]);
/// let config = Config::default().with_args(&args);
/// assert_eq!(config.port, 9000);
/// ```
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "shipyard")]
#[command(version)]
#[command(about = "Admin backend for products, releases, clients and licenses")]
pub struct CliArgs {
    /// Path of a TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// IP address to bind the HTTP server to
    #[arg(long, env = "SHIPYARD_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// TCP port of the HTTP server
    #[arg(long, env = "SHIPYARD_PORT")]
    pub port: Option<u16>,

    /// Directory holding the JSON collection files
    ///
    /// The assignment file lives in its `data/` subdirectory, which is
    /// created on first write.
    #[arg(long, env = "SHIPYARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Default log level (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    ///
    /// `RUST_LOG` directives still take precedence.
    #[arg(long, env = "SHIPYARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Do not send CORS headers
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_cors: bool,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub cors_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            data_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            cors_enabled: true,
        }
    }
}

impl Config {
    /// Builds the configuration from the arguments, reading the file they
    /// name if any, and validates it.
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let base = match &args.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let config = base.with_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Overrides file values with those given on the command line.
    pub fn with_args(mut self, args: &CliArgs) -> Self {
        if let Some(bind_address) = &args.bind_address {
            self.bind_address = bind_address.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(data_dir) = &args.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(log_level) = &args.log_level {
            self.log_level = log_level.clone();
        }
        if args.no_cors {
            self.cors_enabled = false;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        self.log_filter()?;
        if !self.data_dir.is_dir() {
            return Err(ConfigError::DirectoryDoesNotExist(
                self.data_dir.display().to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = IpAddr::from_str(self.bind_address.trim())
            .map_err(|e| ConfigError::BadAddress(format!("{}: {}", self.bind_address, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn log_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::BadLogLevel(self.log_level.clone()))
    }
}
