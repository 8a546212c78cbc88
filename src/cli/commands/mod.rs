//! CLI command implementations.

mod bot;
mod config;
mod doctor;
mod run;
mod search;
mod serve;

pub use bot::run_bot;
pub use config::run_config;
pub use doctor::run_doctor;
pub use run::run_all;
pub use search::run_search;
pub use serve::run_serve;
