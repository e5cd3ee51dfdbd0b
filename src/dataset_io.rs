//! Dataset save/load to disk (JSON).

use std::path::Path;

use tracing::instrument;

use crate::types::{DatasetOrigin, GraphDataset};

/// Default filename for a saved dataset.
pub const DATASET_FILENAME: &str = "graph-dataset.json";

/// Saves a dataset to `path` as JSON.
#[instrument(level = "trace", skip(path, dataset))]
pub fn save_dataset(path: &Path, dataset: &GraphDataset) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(dataset)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}

/// Loads a dataset from `path`, stamping its origin with the local
/// filename. Returns an error if the file is missing or invalid JSON.
#[instrument(level = "trace", skip(path))]
pub fn load_dataset(path: &Path) -> Result<GraphDataset, std::io::Error> {
  let bytes = std::fs::read(path)?;
  let mut dataset: GraphDataset = serde_json::from_slice(&bytes)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  dataset.origin = DatasetOrigin::Local {
    filename: path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| DATASET_FILENAME.to_string()),
  };
  Ok(dataset)
}
