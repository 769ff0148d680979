pub mod commands;
pub mod invocation;
pub mod router;

pub use invocation::{CommandInvocation, Reply, Subcommand, UserRef};
pub use router::Router;
