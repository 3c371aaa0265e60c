pub mod bot;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod matching;
pub mod models;
pub mod vk;

pub use config::AppConfig;
pub use errors::*;
