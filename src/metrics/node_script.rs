//! Script-defined per-node metric.
//!
//! Unlike the script layouts, a missing or malformed script here is a hard
//! failure: an incomplete metric would silently corrupt derived statistics,
//! so the script contract is enforced before and during execution.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use crate::types::{
  AttributeValue, DataGraph, EngineError, FieldKind, GraphSnapshot, ItemType, ParameterMap,
  ParameterSpec, ScriptFn,
};

use super::{MetricDescriptor, MetricOutputs};

const NODE_METRIC_DOC: &str = r#"/**
 * Function that returns the metric value for the specified node.
 *
 * @param {string} id The ID of the node
 * @param {Object.<string, number | string | boolean | null>} attributes Attributes of the node
 * @param {number} index The index position of the node in the graph
 * @param {Graph} graph Read-only snapshot of the full graph
 * @returns {number | string | boolean} The computed metric value
 */"#;

/// Default script: the node's degree.
fn default_node_metric_script() -> ScriptFn {
  Arc::new(|id, _attributes, _index, graph, _args| Ok(json!(graph.degree(id))))
}

/// Accepts only scalar results; run once against a sample node before the
/// script is accepted.
fn check_node_metric(script: &ScriptFn, graph: &GraphSnapshot) -> Result<(), EngineError> {
  let Some(id) = graph.node_ids().next() else {
    return Ok(());
  };
  let attributes = graph.node_attributes(id).cloned().unwrap_or_default();
  let result = script(id, &attributes, 0, graph, &Vec::new())?;
  if AttributeValue::from_json(&result).is_none() {
    return Err(EngineError::script(format!(
      "metric script must return a number, a string, a boolean or null, got `{result}`"
    )));
  }
  Ok(())
}

pub fn node_script_metric() -> MetricDescriptor {
  MetricDescriptor {
    id: "nodeScript".to_string(),
    item_type: ItemType::Nodes,
    outputs: vec![("custom".to_string(), FieldKind::Category)],
    parameters: vec![ParameterSpec::Script {
      id: "script".to_string(),
      function_doc: NODE_METRIC_DOC,
      default: Some(default_node_metric_script()),
      check: Some(check_node_metric),
    }],
    compute: compute_node_script,
  }
}

fn compute_node_script(
  parameters: &ParameterMap,
  graph: &DataGraph,
) -> Result<MetricOutputs, EngineError> {
  let script = parameters
    .get("script")
    .and_then(|v| v.as_script())
    .ok_or_else(|| EngineError::validation("nodeScript", "script", "no script configured"))?;

  // The script only ever sees a frozen copy of the graph.
  let snapshot = graph.snapshot();
  let mut values: BTreeMap<String, AttributeValue> = BTreeMap::new();
  for (index, (id, attributes)) in graph.nodes.iter().enumerate() {
    let result = script(id, attributes, index, &snapshot, &Vec::new())?;
    let value = AttributeValue::from_json(&result).ok_or_else(|| {
      EngineError::script(format!(
        "metric script returned a non-scalar value for node `{id}`"
      ))
    })?;
    values.insert(id.clone(), value);
  }

  let mut outputs = MetricOutputs::new();
  outputs.insert("custom".to_string(), values);
  Ok(outputs)
}
