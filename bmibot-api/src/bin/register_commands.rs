use std::error::Error;

use bmibot_api::{
    config::Config,
    registration::{self, DISCORD_API_URL},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log4rs::init_file("log4rs.yml", Default::default())?;

    let config = Config::load()?;
    let registrar = registration::create(DISCORD_API_URL, config.discord_credentials()?);
    registration::register_commands(&registrar).await?;

    Ok(())
}
