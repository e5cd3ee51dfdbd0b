//! Engine error taxonomy: validation, script contract, computation.

use thiserror::Error;

/// Errors raised by the metric and layout engines.
///
/// `Validation` and `ScriptContract` are raised before execution and guarantee
/// that the dataset was not touched. `Computation` wraps a failure inside a
/// descriptor's compute function; the engine never merges partial results
/// after one. Soft failures (missing optional layout configuration) are not
/// errors: they log a diagnostic line and yield an empty result instead.
#[derive(Debug, Error)]
pub enum EngineError {
  /// A required parameter is missing or an invalid value was supplied.
  #[error("invalid parameter `{parameter}` for `{owner}`: {reason}")]
  Validation {
    owner: String,
    parameter: String,
    reason: String,
  },

  /// A user-supplied script failed its contract check or returned a
  /// malformed result. Treated as a validation-class error: it blocks
  /// execution and is never silently accepted.
  #[error("script contract violation: {reason}")]
  ScriptContract { reason: String },

  /// A descriptor's compute function failed mid-run.
  #[error("computation failed in `{owner}`: {reason}")]
  Computation { owner: String, reason: String },

  /// Lookup of a metric or layout descriptor by id failed.
  #[error("unknown descriptor `{0}`")]
  UnknownDescriptor(String),

  /// A node or edge id was not found in the graph.
  #[error("unknown graph item `{0}`")]
  UnknownItem(String),
}

impl EngineError {
  pub fn validation(
    owner: impl Into<String>,
    parameter: impl Into<String>,
    reason: impl Into<String>,
  ) -> Self {
    Self::Validation {
      owner: owner.into(),
      parameter: parameter.into(),
      reason: reason.into(),
    }
  }

  pub fn script(reason: impl Into<String>) -> Self {
    Self::ScriptContract {
      reason: reason.into(),
    }
  }

  pub fn computation(owner: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::Computation {
      owner: owner.into(),
      reason: reason.into(),
    }
  }

  /// True for errors raised before execution (validation class).
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::Validation { .. } | Self::ScriptContract { .. }
    )
  }
}
