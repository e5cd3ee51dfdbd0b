//! Session-persisted metric configuration, keyed by metric id.
//!
//! Only the configuration is persisted, never the descriptor itself: chosen
//! parameter values (as JSON; scripts are not persistable) and chosen output
//! attribute names. Read on metric selection, written on parameter change,
//! resettable to descriptor defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricDescriptor;
use crate::store::Transform;

/// Persisted configuration of one metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
  /// Chosen parameter values, keyed by parameter id.
  pub parameters: BTreeMap<String, serde_json::Value>,
  /// Chosen output attribute name per declared output key.
  pub attribute_names: BTreeMap<String, String>,
}

/// Session state held in its own atom, serialized by the host shell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
  pub metric_configs: BTreeMap<String, MetricConfig>,
}

/// Defaults derived from a descriptor: declared parameter defaults and
/// output keys as attribute names.
pub fn default_metric_config(descriptor: &MetricDescriptor) -> MetricConfig {
  let parameters = descriptor
    .parameters
    .iter()
    .filter_map(|spec| {
      let default = spec.default_value()?.to_json()?;
      Some((spec.id().to_string(), default))
    })
    .collect();
  let attribute_names = descriptor
    .outputs
    .iter()
    .map(|(key, _)| (key.clone(), key.clone()))
    .collect();
  MetricConfig {
    parameters,
    attribute_names,
  }
}

/// Configuration for a metric: the stored one, or descriptor defaults when
/// the metric was never configured in this session.
pub fn metric_config(state: &SessionState, descriptor: &MetricDescriptor) -> MetricConfig {
  state
    .metric_configs
    .get(&descriptor.id)
    .cloned()
    .unwrap_or_else(|| default_metric_config(descriptor))
}

/// Producer: store the configuration for one metric.
pub fn set_metric_config(
  metric_id: String,
  config: MetricConfig,
) -> Transform<SessionState> {
  Box::new(move |state| {
    let mut next = state.clone();
    next.metric_configs.insert(metric_id, config);
    Ok(next)
  })
}

/// Producer: reset one metric's configuration to descriptor defaults.
pub fn reset_metric_config(descriptor: &'static MetricDescriptor) -> Transform<SessionState> {
  Box::new(move |state| {
    let mut next = state.clone();
    next
      .metric_configs
      .insert(descriptor.id.clone(), default_metric_config(descriptor));
    Ok(next)
  })
}
