use async_trait::async_trait;
use bmibot_router::commands;
use log::info;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::config::DiscordCredentials;

pub const DISCORD_API_URL: &str = "https://discord.com/api/v10";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("server unreachable")]
    CommunicationError,
    #[error("internal server error")]
    InternalServerError,
    #[error("invalid request")]
    RequestError,
}

type Result<T> = std::result::Result<T, Error>;

#[mockall::automock]
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Replaces all global application commands with `commands`.
    async fn overwrite_commands(&self, commands: &Value) -> Result<()>;
}

pub struct RegistrarImpl {
    url: String,
    token: String,
    client: reqwest::Client,
}

impl RegistrarImpl {
    fn new(base_url: &str, credentials: DiscordCredentials) -> Self {
        Self {
            url: format!(
                "{}/applications/{}/commands",
                base_url.trim_end_matches('/'),
                credentials.application_id
            ),
            token: credentials.token,
            client: reqwest::Client::new(),
        }
    }
}

pub fn create(base_url: &str, credentials: DiscordCredentials) -> impl Registrar {
    RegistrarImpl::new(base_url, credentials)
}

#[async_trait]
impl Registrar for RegistrarImpl {
    async fn overwrite_commands(&self, commands: &Value) -> Result<()> {
        self.client
            .put(&self.url)
            .header(AUTHORIZATION, format!("Bot {}", self.token))
            .json(commands)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)
            .and_then(|resp| {
                if resp.status().is_client_error() {
                    Err(Error::RequestError)
                } else if resp.status().is_server_error() {
                    Err(Error::InternalServerError)
                } else {
                    Ok(())
                }
            })
    }
}

/// Uploads the `/bmi` command surface and returns how many top-level
/// commands were registered.
pub async fn register_commands(registrar: &dyn Registrar) -> Result<usize> {
    let definition = commands::definition();
    let count = definition.as_array().map_or(0, Vec::len);
    info!("Registering {} application commands", count);
    registrar.overwrite_commands(&definition).await?;
    info!("Slash commands registered globally");
    Ok(count)
}
