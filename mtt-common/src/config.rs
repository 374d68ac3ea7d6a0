//! Configuration loading and settings resolution
//!
//! Each setting resolves through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default shared password. Deployments are expected to override this via
/// config or `MTT_PASSWORD`.
pub const DEFAULT_PASSWORD: &str = "shogolab";

/// Name of the persisted document inside the data folder.
pub const DOCUMENT_FILE_NAME: &str = "mouseTrainingData.json";

/// Resolved service settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub password: String,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Path of the persisted training document.
    pub fn document_path(&self) -> PathBuf {
        self.data_dir.join(DOCUMENT_FILE_NAME)
    }
}

/// Optional keys of `config.toml`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    port: Option<u16>,
    password: Option<String>,
    data_dir: Option<PathBuf>,
}

/// Resolve settings from CLI arguments, environment, config file and
/// defaults, in that order of priority.
pub fn resolve_settings(
    cli_port: Option<u16>,
    cli_password: Option<String>,
    cli_data_dir: Option<PathBuf>,
) -> Settings {
    let file = load_config_file();

    let port = cli_port
        .or_else(|| {
            std::env::var("MTT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or(file.port)
        .unwrap_or(DEFAULT_PORT);

    let password = cli_password
        .or_else(|| std::env::var("MTT_PASSWORD").ok())
        .or(file.password)
        .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

    let data_dir = cli_data_dir
        .or_else(|| std::env::var("MTT_DATA_DIR").ok().map(PathBuf::from))
        .or(file.data_dir)
        .unwrap_or_else(default_data_dir);

    Settings {
        port,
        password,
        data_dir,
    }
}

/// Parse `config.toml` if present; malformed files are logged and ignored
/// rather than blocking startup.
fn load_config_file() -> ConfigFile {
    let Some(path) = config_file_path() else {
        return ConfigFile::default();
    };
    if !path.exists() {
        return ConfigFile::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(text) => match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed config file {}: {}", path.display(), e);
                ConfigFile::default()
            }
        },
        Err(e) => {
            warn!("Could not read config file {}: {}", path.display(), e);
            ConfigFile::default()
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mtt").join("config.toml"))
}

/// OS-dependent default data folder.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mtt"))
        .unwrap_or_else(|| PathBuf::from("./mtt_data"))
}

/// Create the data folder if missing.
pub fn ensure_data_dir(dir: &Path) -> crate::Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}
