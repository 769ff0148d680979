use std::{
    env, fs,
    path::{Path, PathBuf},
};

use bmibot_db::StoreConfig;
use dotenv::dotenv;
use log::{debug, info};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "bmibot.ron";
const DEFAULT_DATA_FILE: &str = "data/state.json";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Json,
}

/// Settings as read from the RON config file. Every field is optional,
/// environment variables take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub store: Option<StoreKind>,
    pub database_url: Option<String>,
    pub data_file: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub discord_token: Option<String>,
    pub discord_application_id: Option<String>,
}

impl FileConfig {
    pub fn from_ron(contents: &str) -> Result<Self> {
        Ok(ron::from_str(contents)?)
    }

    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }
        info!("Reading config file {}", path.display());
        Self::from_ron(&fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordCredentials {
    pub token: String,
    pub application_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    store: Option<StoreKind>,
    database_url: Option<String>,
    data_file: Option<PathBuf>,
    bind_address: Option<String>,
    discord_token: Option<String>,
    discord_application_id: Option<String>,
}

impl Config {
    /// Loads `.env`, the RON config file (`BMIBOT_CONFIG` or `bmibot.ron`)
    /// and the process environment, in increasing order of precedence.
    pub fn load() -> Result<Self> {
        dotenv().ok();
        let path = env::var("BMIBOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
        let file = FileConfig::read(Path::new(&path))?;
        Self::from_sources(file, |name| env::var(name).ok())
    }

    pub fn from_sources(file: FileConfig, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store = match var("BMIBOT_STORE") {
            Some(value) => Some(match value.to_lowercase().as_str() {
                "sqlite" => StoreKind::Sqlite,
                "json" => StoreKind::Json,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "BMIBOT_STORE",
                        value,
                    })
                }
            }),
            None => file.store,
        };

        Ok(Self {
            store,
            database_url: var("DATABASE_URL").or(file.database_url),
            data_file: var("DATA_FILE").map(PathBuf::from).or(file.data_file),
            bind_address: var("BIND_ADDRESS").or(file.bind_address),
            discord_token: var("DISCORD_TOKEN").or(file.discord_token),
            discord_application_id: var("DISCORD_APPLICATION_ID").or(file.discord_application_id),
        })
    }

    pub fn store(&self) -> Result<StoreConfig> {
        match self.store.unwrap_or(StoreKind::Sqlite) {
            StoreKind::Sqlite => Ok(StoreConfig::Sqlite {
                url: self
                    .database_url
                    .clone()
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            }),
            StoreKind::Json => Ok(StoreConfig::JsonFile {
                path: self
                    .data_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            }),
        }
    }

    pub fn bind_address(&self) -> &str {
        self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn discord_credentials(&self) -> Result<DiscordCredentials> {
        Ok(DiscordCredentials {
            token: self
                .discord_token
                .clone()
                .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?,
            application_id: self
                .discord_application_id
                .clone()
                .ok_or(ConfigError::Missing("DISCORD_APPLICATION_ID"))?,
        })
    }
}
