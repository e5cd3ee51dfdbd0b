//! Edge disparity metric (backbone significance score).
//!
//! Computed on the simple projection of the graph: parallel edges are
//! collapsed and their weights summed before scoring, then every original
//! edge receives the score of its collapsed pair. Disparity is undefined
//! (null) for self-loops and for edges whose endpoints both have simple
//! degree < 2; those edges keep a null value while qualifying edges are
//! still written.

use std::collections::BTreeMap;

use crate::types::{
  AttributeValue, DataGraph, EngineError, FieldKind, ItemType, ParameterMap, ParameterSpec,
  edge_weight,
};

use super::{MetricDescriptor, MetricOutputs};

pub fn disparity_metric() -> MetricDescriptor {
  MetricDescriptor {
    id: "disparity".to_string(),
    item_type: ItemType::Edges,
    outputs: vec![("disparity".to_string(), FieldKind::Quantitative)],
    parameters: vec![ParameterSpec::Attribute {
      id: "getEdgeWeight".to_string(),
      item_type: ItemType::Edges,
      restriction: Some(FieldKind::Quantitative),
      required: false,
    }],
    compute: compute_disparity,
  }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
  if a <= b {
    (a.to_string(), b.to_string())
  } else {
    (b.to_string(), a.to_string())
  }
}

fn compute_disparity(
  parameters: &ParameterMap,
  graph: &DataGraph,
) -> Result<MetricOutputs, EngineError> {
  let weight_attribute = parameters.get("getEdgeWeight").and_then(|v| v.as_text());

  // Simple projection: summed weight per unordered node pair.
  let mut pair_weights: BTreeMap<(String, String), f64> = BTreeMap::new();
  for edge in graph.edges.values() {
    if edge.source == edge.target {
      continue;
    }
    *pair_weights
      .entry(pair_key(&edge.source, &edge.target))
      .or_insert(0.0) += edge_weight(edge, weight_attribute);
  }

  // Per-node strength and simple degree.
  let mut strength: BTreeMap<&str, f64> = BTreeMap::new();
  let mut simple_degree: BTreeMap<&str, usize> = BTreeMap::new();
  for ((a, b), weight) in &pair_weights {
    for node in [a.as_str(), b.as_str()] {
      *strength.entry(node).or_insert(0.0) += weight;
      *simple_degree.entry(node).or_insert(0) += 1;
    }
  }

  let mut values: BTreeMap<String, AttributeValue> = BTreeMap::new();
  for (id, edge) in &graph.edges {
    if edge.source == edge.target {
      values.insert(id.clone(), AttributeValue::Null);
      continue;
    }
    let weight = pair_weights[&pair_key(&edge.source, &edge.target)];
    let mut alpha: Option<f64> = None;
    for node in [edge.source.as_str(), edge.target.as_str()] {
      let k = simple_degree.get(node).copied().unwrap_or(0);
      if k < 2 {
        continue;
      }
      let s = strength.get(node).copied().unwrap_or(0.0);
      if s <= 0.0 {
        continue;
      }
      let end_alpha = (1.0 - weight / s).powi(k as i32 - 1);
      alpha = Some(alpha.map_or(end_alpha, |a: f64| a.min(end_alpha)));
    }
    values.insert(
      id.clone(),
      alpha.map(AttributeValue::Number).unwrap_or(AttributeValue::Null),
    );
  }

  let mut outputs = MetricOutputs::new();
  outputs.insert("disparity".to_string(), values);
  Ok(outputs)
}
