pub mod config;
pub mod credential;
pub mod error;
pub mod providers;
pub mod server;
mod utils;

pub use credential::{ApiKey, CredentialSource, EnvCredential, StaticCredential};
pub use error::RelayError;
