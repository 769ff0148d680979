use actix_web::{get, post, web, Responder};
use bmibot_router::{commands, CommandInvocation, Router};

#[post("/interactions")]
async fn interactions(
    router: web::Data<Router>,
    invocation: web::Json<CommandInvocation>,
) -> impl Responder {
    web::Json(router.handle(invocation.into_inner()).await)
}

#[get("/commands")]
async fn command_definition() -> impl Responder {
    web::Json(commands::definition())
}

#[get("/health")]
async fn health() -> &'static str {
    "ok"
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(interactions)
        .service(command_definition)
        .service(health);
}
