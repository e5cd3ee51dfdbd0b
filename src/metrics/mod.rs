//! Metric engine: descriptors, registry, and computation/merge pipeline.

use once_cell::sync::Lazy;

use crate::types::{DataGraph, EngineError, FieldKind, ItemType, ParameterMap, ParameterSpec};

mod degree;
#[cfg(test)]
mod degree_test;
mod disparity;
#[cfg(test)]
mod disparity_test;
mod engine;
mod node_script;

pub use degree::degree_metric;
pub use disparity::disparity_metric;
pub use engine::{MetricReport, compute_metric};
pub use node_script::node_script_metric;

/// Computed values for one metric run: output key → item id → value.
/// Partial mappings are allowed; absent items keep their prior value.
pub type MetricOutputs =
  std::collections::BTreeMap<String, std::collections::BTreeMap<String, crate::types::AttributeValue>>;

/// Compute function of a metric descriptor. Runs to completion; errors
/// propagate uncaught to the caller and nothing is merged.
pub type MetricFn = fn(&ParameterMap, &DataGraph) -> Result<MetricOutputs, EngineError>;

/// Immutable declaration of one metric.
#[derive(Clone, Debug)]
pub struct MetricDescriptor {
  pub id: String,
  pub item_type: ItemType,
  /// Declared output keys and their type constraints.
  pub outputs: Vec<(String, FieldKind)>,
  pub parameters: Vec<ParameterSpec>,
  pub compute: MetricFn,
}

/// Immutable process-wide metric registry, built once at startup.
pub static METRICS: Lazy<Vec<MetricDescriptor>> = Lazy::new(|| {
  vec![degree_metric(), disparity_metric(), node_script_metric()]
});

/// Looks up a registered metric by id.
pub fn metric_by_id(id: &str) -> Result<&'static MetricDescriptor, EngineError> {
  METRICS
    .iter()
    .find(|m| m.id == id)
    .ok_or_else(|| EngineError::UnknownDescriptor(id.to_string()))
}
