pub mod ai_gateway;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod logging;
pub mod post;
pub mod protocol;
pub mod server;
