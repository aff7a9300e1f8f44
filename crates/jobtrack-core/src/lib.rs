pub mod config;
pub mod http;
pub mod job;
pub mod logging;
pub mod retry;
