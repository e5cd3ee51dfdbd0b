//! Full graph structure: nodes, edges, and the read-only script snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AttributeValue, EngineError, ItemData};

/// One edge of the full graph. Multi-edges and self-loops are permitted;
/// each edge has its own unique id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
  pub source: String,
  pub target: String,
  pub attributes: ItemData,
}

/// The authoritative graph: node and edge attributes keyed by unique id.
///
/// `BTreeMap` keeps iteration order deterministic, which makes metric and
/// layout output stable across runs on the same graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataGraph {
  pub nodes: BTreeMap<String, ItemData>,
  pub edges: BTreeMap<String, EdgeRecord>,
}

impl DataGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of nodes.
  pub fn order(&self) -> usize {
    self.nodes.len()
  }

  /// Number of edges.
  pub fn size(&self) -> usize {
    self.edges.len()
  }

  pub fn add_node(&mut self, id: impl Into<String>, attributes: ItemData) {
    self.nodes.insert(id.into(), attributes);
  }

  /// Inserts an edge; both endpoints must already exist.
  pub fn add_edge(
    &mut self,
    id: impl Into<String>,
    source: impl Into<String>,
    target: impl Into<String>,
    attributes: ItemData,
  ) -> Result<(), EngineError> {
    let (source, target) = (source.into(), target.into());
    for endpoint in [&source, &target] {
      if !self.nodes.contains_key(endpoint) {
        return Err(EngineError::UnknownItem(endpoint.clone()));
      }
    }
    self.edges.insert(
      id.into(),
      EdgeRecord {
        source,
        target,
        attributes,
      },
    );
    Ok(())
  }

  /// Node ids in stable (sorted) order.
  pub fn node_ids(&self) -> impl Iterator<Item = &String> {
    self.nodes.keys()
  }

  /// Edges incident to `node`, self-loops included once per edge record.
  pub fn incident_edges(&self, node: &str) -> impl Iterator<Item = (&String, &EdgeRecord)> {
    self
      .edges
      .iter()
      .filter(move |(_, e)| e.source == node || e.target == node)
  }

  /// Unweighted degree: count of incident edge records (self-loops count 2).
  pub fn degree(&self, node: &str) -> usize {
    self
      .incident_edges(node)
      .map(|(_, e)| if e.source == e.target { 2 } else { 1 })
      .sum()
  }

  /// Sum of incident edge weights read from `weight_attribute`
  /// (1.0 per edge when the attribute is absent or not numeric).
  pub fn weighted_degree(&self, node: &str, weight_attribute: Option<&str>) -> f64 {
    self
      .incident_edges(node)
      .map(|(_, e)| edge_weight(e, weight_attribute))
      .sum()
  }

  /// Read-only copy handed to user scripts.
  pub fn snapshot(&self) -> GraphSnapshot {
    GraphSnapshot {
      graph: self.clone(),
    }
  }
}

/// Weight of one edge: the named attribute when numeric, else 1.0.
pub fn edge_weight(edge: &EdgeRecord, weight_attribute: Option<&str>) -> f64 {
  weight_attribute
    .and_then(|attr| edge.attributes.get(attr))
    .and_then(AttributeValue::as_number)
    .unwrap_or(1.0)
}

/// Structurally immutable graph view passed to user-supplied scripts.
///
/// Holds its own copy of the graph and exposes no mutating API, so a script
/// can never reach the live dataset.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
  graph: DataGraph,
}

impl GraphSnapshot {
  pub fn order(&self) -> usize {
    self.graph.order()
  }

  pub fn size(&self) -> usize {
    self.graph.size()
  }

  pub fn node_ids(&self) -> impl Iterator<Item = &String> {
    self.graph.node_ids()
  }

  pub fn node_attributes(&self, id: &str) -> Option<&ItemData> {
    self.graph.nodes.get(id)
  }

  pub fn edge(&self, id: &str) -> Option<&EdgeRecord> {
    self.graph.edges.get(id)
  }

  pub fn degree(&self, node: &str) -> usize {
    self.graph.degree(node)
  }
}

impl From<&DataGraph> for GraphSnapshot {
  fn from(graph: &DataGraph) -> Self {
    graph.snapshot()
  }
}
