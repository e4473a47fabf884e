pub mod assets;
pub mod client;
pub mod comments;
pub mod config;
pub mod entities;
pub mod error;
pub mod loader;
pub mod logging;
pub mod navigator;
pub mod resolver;
pub mod session;
pub mod utils;
pub mod views;
pub mod web_ui;
