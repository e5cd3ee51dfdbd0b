//! Node degree metric (in/out/total, optionally edge-weighted).

use std::collections::BTreeMap;

use crate::types::{
  AttributeValue, DataGraph, EngineError, FieldKind, ItemType, ParameterMap, ParameterSpec,
  edge_weight,
};

use super::{MetricDescriptor, MetricOutputs};

pub fn degree_metric() -> MetricDescriptor {
  MetricDescriptor {
    id: "degree".to_string(),
    item_type: ItemType::Nodes,
    outputs: vec![("degree".to_string(), FieldKind::Quantitative)],
    parameters: vec![
      ParameterSpec::Enum {
        id: "direction".to_string(),
        default: "total".to_string(),
        values: vec!["in".to_string(), "out".to_string(), "total".to_string()],
        required: false,
      },
      ParameterSpec::Attribute {
        id: "edgeWeight".to_string(),
        item_type: ItemType::Edges,
        restriction: Some(FieldKind::Quantitative),
        required: false,
      },
    ],
    compute: compute_degree,
  }
}

fn compute_degree(
  parameters: &ParameterMap,
  graph: &DataGraph,
) -> Result<MetricOutputs, EngineError> {
  let direction = parameters
    .get("direction")
    .and_then(|v| v.as_text())
    .unwrap_or("total");
  let weight_attribute = parameters.get("edgeWeight").and_then(|v| v.as_text());

  let mut values: BTreeMap<String, AttributeValue> = graph
    .node_ids()
    .map(|id| (id.clone(), AttributeValue::Number(0.0)))
    .collect();
  for edge in graph.edges.values() {
    let weight = edge_weight(edge, weight_attribute);
    let touches: &[&String] = match direction {
      "in" => &[&edge.target],
      "out" => &[&edge.source],
      _ => &[&edge.source, &edge.target],
    };
    for node in touches {
      if let Some(AttributeValue::Number(current)) = values.get_mut(node.as_str()) {
        *current += weight;
      }
    }
  }

  let mut outputs = MetricOutputs::new();
  outputs.insert("degree".to_string(), values);
  Ok(outputs)
}
