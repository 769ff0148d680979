use std::error::Error;

use actix_web::{web, App, HttpServer};
use bmibot_api::{config::Config, routes};
use bmibot_router::Router;
use log::info;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log4rs::init_file("log4rs.yml", Default::default())?;

    let config = Config::load()?;
    let store = bmibot_db::open(&config.store()?).await?;
    let router = web::Data::new(Router::new(store));

    info!("Listening on {}", config.bind_address());
    HttpServer::new(move || {
        App::new()
            .app_data(router.clone())
            .configure(routes::configure)
    })
    .bind(config.bind_address())?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
