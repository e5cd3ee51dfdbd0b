//! Cloud storage boundary. The core only ever exchanges serialized
//! in-memory graphs; providers are implemented by the host shell.

use async_trait::async_trait;
use thiserror::Error;

/// Reference to one remote file, keyed by an opaque provider id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudFileRef {
  pub id: String,
  pub filename: String,
}

#[derive(Debug, Error)]
pub enum CloudError {
  #[error("cloud file `{0}` not found")]
  NotFound(String),
  #[error("cloud provider error: {0}")]
  Provider(String),
}

/// Remote file operations exposed by a cloud provider.
#[async_trait]
pub trait CloudProvider: Send + Sync {
  async fn list_files(&self) -> Result<Vec<CloudFileRef>, CloudError>;

  /// Fetches the serialized dataset stored under `id`.
  async fn get_file(&self, id: &str) -> Result<String, CloudError>;

  /// Stores a serialized dataset; returns the resulting file reference.
  async fn save_file(
    &self,
    id: Option<&str>,
    filename: &str,
    content: &str,
  ) -> Result<CloudFileRef, CloudError>;

  async fn delete_file(&self, id: &str) -> Result<(), CloudError>;
}
