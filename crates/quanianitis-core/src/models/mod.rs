/// Data models for the quanianitis provider
pub mod config;
pub mod mail;

// Re-export commonly used types
pub use config::*;
pub use mail::*;
