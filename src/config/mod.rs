//! Deployment configuration — `.shopvault.toml` settings and the
//! environment variable naming the encryption secret.

pub mod settings;

pub use settings::{Settings, ENCRYPTION_SECRET_ENV};
