//! Derived filtered view of the full graph.
//!
//! Filters produce a read-only graph consumed by display and by metric
//! computations restricted to visible items; the result is never merged
//! back into the dataset.

use std::collections::BTreeSet;

use crate::types::{
  AttributeValue, DataGraph, EngineError, GraphSnapshot, ItemData, ItemType, ScriptFn,
};

/// One active filter predicate.
#[derive(Clone)]
pub enum FilterPredicate {
  /// Keeps items whose quantitative `field` lies within the bounds.
  /// Items missing the field (or holding a non-number) are dropped.
  Range {
    item_type: ItemType,
    field: String,
    min: Option<f64>,
    max: Option<f64>,
  },
  /// Keeps items whose qualitative `field` value is one of `values`.
  Terms {
    item_type: ItemType,
    field: String,
    values: BTreeSet<String>,
  },
  /// Keeps items for which the script returns `true`. The script sees a
  /// read-only snapshot of the unfiltered graph.
  Script { item_type: ItemType, script: ScriptFn },
}

impl FilterPredicate {
  fn item_type(&self) -> ItemType {
    match self {
      Self::Range { item_type, .. }
      | Self::Terms { item_type, .. }
      | Self::Script { item_type, .. } => *item_type,
    }
  }

  fn passes(
    &self,
    id: &str,
    attributes: &ItemData,
    index: usize,
    snapshot: &GraphSnapshot,
  ) -> Result<bool, EngineError> {
    match self {
      Self::Range { field, min, max, .. } => {
        let Some(value) = attributes.get(field).and_then(AttributeValue::as_number) else {
          return Ok(false);
        };
        Ok(min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m))
      }
      Self::Terms { field, values, .. } => Ok(
        attributes
          .get(field)
          .and_then(AttributeValue::as_text)
          .is_some_and(|v| values.contains(v)),
      ),
      Self::Script { script, .. } => {
        let result = script(id, attributes, index, snapshot, &Vec::new())?;
        result.as_bool().ok_or_else(|| {
          EngineError::script(format!(
            "filter script must return a boolean, got `{result}` for item `{id}`"
          ))
        })
      }
    }
  }
}

/// Computes the filtered graph: nodes passing every node predicate, then
/// edges whose endpoints both survive and which pass every edge predicate.
pub fn filtered_graph(
  graph: &DataGraph,
  filters: &[FilterPredicate],
) -> Result<DataGraph, EngineError> {
  let node_filters: Vec<_> = filters
    .iter()
    .filter(|f| f.item_type() == ItemType::Nodes)
    .collect();
  let edge_filters: Vec<_> = filters
    .iter()
    .filter(|f| f.item_type() == ItemType::Edges)
    .collect();

  // One frozen copy shared by every script predicate in this pass.
  let snapshot = graph.snapshot();
  let mut filtered = DataGraph::new();
  for (index, (id, attributes)) in graph.nodes.iter().enumerate() {
    let mut visible = true;
    for filter in &node_filters {
      if !filter.passes(id, attributes, index, &snapshot)? {
        visible = false;
        break;
      }
    }
    if visible {
      filtered.add_node(id.clone(), attributes.clone());
    }
  }
  for (index, (id, edge)) in graph.edges.iter().enumerate() {
    if !filtered.nodes.contains_key(&edge.source) || !filtered.nodes.contains_key(&edge.target) {
      continue;
    }
    let mut visible = true;
    for filter in &edge_filters {
      if !filter.passes(id, &edge.attributes, index, &snapshot)? {
        visible = false;
        break;
      }
    }
    if visible {
      filtered.add_edge(
        id.clone(),
        edge.source.clone(),
        edge.target.clone(),
        edge.attributes.clone(),
      )?;
    }
  }
  Ok(filtered)
}
