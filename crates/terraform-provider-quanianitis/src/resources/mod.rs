/// Managed resources
pub mod mail;
