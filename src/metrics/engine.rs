//! Metric computation pipeline: validate, execute, type-check, merge.

use std::collections::{BTreeMap, HashMap};

use tracing::{info, instrument};

use crate::types::{
  AttributeWrites, DataGraph, EngineError, FieldKind, GraphDataset, ParameterMap,
  merge_metric_outputs, resolve_parameters, validate_parameters,
};

use super::MetricDescriptor;

/// Result of one metric computation.
#[derive(Debug)]
pub struct MetricReport {
  /// Dataset with the outputs merged into the full graph and field schema.
  pub dataset: GraphDataset,
  /// Output attribute names that already existed as fields. Non-fatal: the
  /// caller surfaces these as warnings, the attribute was overwritten.
  pub collisions: Vec<String>,
}

/// Computes a metric and merges its outputs into a copy of the dataset.
///
/// Order of operations matters for the no-partial-write guarantee: the merge
/// happens only after the compute function returned successfully and every
/// value passed its output type constraint. Any error before that leaves
/// the returned dataset unbuilt and the caller's dataset untouched.
#[instrument(level = "debug", skip_all, fields(metric = %descriptor.id))]
pub fn compute_metric(
  descriptor: &MetricDescriptor,
  parameter_values: &ParameterMap,
  output_attribute_names: &HashMap<String, String>,
  graph: &DataGraph,
  dataset: &GraphDataset,
) -> Result<MetricReport, EngineError> {
  validate_parameters(
    &descriptor.id,
    &descriptor.parameters,
    parameter_values,
    dataset,
  )?;
  let parameters = resolve_parameters(&descriptor.parameters, parameter_values);

  // Collision detection is a warning, not an error: the caller chose the
  // name, the existing attribute gets overwritten.
  let mut collisions = Vec::new();
  let mut chosen_names: BTreeMap<&str, &str> = BTreeMap::new();
  for (output_key, _) in &descriptor.outputs {
    let name = output_attribute_names
      .get(output_key)
      .map(String::as_str)
      .unwrap_or(output_key);
    if dataset.field(descriptor.item_type, name).is_some() {
      collisions.push(name.to_string());
    }
    chosen_names.insert(output_key, name);
  }

  let outputs = (descriptor.compute)(&parameters, graph)?;

  let mut writes: AttributeWrites = BTreeMap::new();
  let mut kinds: BTreeMap<String, FieldKind> = BTreeMap::new();
  for (output_key, constraint) in &descriptor.outputs {
    let Some(values) = outputs.get(output_key) else {
      return Err(EngineError::computation(
        &descriptor.id,
        format!("declared output `{output_key}` missing from result"),
      ));
    };
    for (item_id, value) in values {
      if !value.matches_kind(*constraint) {
        return Err(EngineError::computation(
          &descriptor.id,
          format!(
            "output `{output_key}` value for `{item_id}` does not match {constraint:?}"
          ),
        ));
      }
    }
    let name = chosen_names[output_key.as_str()].to_string();
    kinds.insert(name.clone(), *constraint);
    writes.insert(name, values.clone());
  }

  let merge = merge_metric_outputs(descriptor.item_type, writes, kinds);
  let merged = merge(dataset)?;
  info!(
    metric = %descriptor.id,
    outputs = descriptor.outputs.len(),
    collisions = collisions.len(),
    "metric computed"
  );
  Ok(MetricReport {
    dataset: merged,
    collisions,
  })
}
