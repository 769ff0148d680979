pub mod config;
pub mod registration;
pub mod routes;
