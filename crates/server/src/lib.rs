pub mod bootstrap;
pub mod health;
pub mod web;

pub use bootstrap::{bootstrap, bootstrap_with_config, Application, BootstrapError};
pub use web::{router, AppState};
