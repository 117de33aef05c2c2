/// Provider services
pub mod client;
pub mod config;
pub mod mail;
