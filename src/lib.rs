pub mod analysis;
pub mod auth;
pub mod cache;
pub mod commands;
pub mod config;
pub mod db;
pub mod fingerprint;
pub mod http;
pub mod logger;
pub mod ui;
