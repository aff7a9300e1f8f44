//! CLI command handlers.

mod config;
mod submit;
mod track;
mod watch;

pub use config::run_config;
pub use submit::run_submit;
pub use watch::run_watch;
