//! Configuration for the conversation client
//!
//! Configuration comes from an optional YAML file, then `AGORA_*` environment
//! variables, then whatever the embedding application sets explicitly.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;


use crate::errors::ClientError;
use std::path::Path;

/// Load a configuration from a YAML file
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ClientError> {
    ConfigLoader::from_file(path).await
}
