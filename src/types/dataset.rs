//! Graph dataset: full graph + derived rendering data + field schemas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::Transform;

use super::{
  AttributeValue, DataGraph, EngineError, FieldKind, FieldModel, ItemData, ItemType,
};

/// Per-node visual attributes, derived from the graph by layouts, metrics
/// and import. Never hand-authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRenderingData {
  pub x: f64,
  pub y: f64,
  pub size: f64,
  pub color: String,
  pub label: Option<String>,
  pub hidden: bool,
}

impl Default for NodeRenderingData {
  fn default() -> Self {
    Self {
      x: 0.0,
      y: 0.0,
      size: 1.0,
      color: "#999999".to_string(),
      label: None,
      hidden: false,
    }
  }
}

/// Per-edge visual attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRenderingData {
  pub size: f64,
  pub color: String,
  pub label: Option<String>,
  pub hidden: bool,
}

impl Default for EdgeRenderingData {
  fn default() -> Self {
    Self {
      size: 1.0,
      color: "#cccccc".to_string(),
      label: None,
      hidden: false,
    }
  }
}

/// Provenance of the loaded graph; used only for save/export routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatasetOrigin {
  New,
  Local { filename: String },
  Cloud { id: String, filename: String },
}

/// The shared dataset owned by one atom.
///
/// Invariant: the key sets of `node_rendering`/`edge_rendering` always equal
/// the id sets of `full_graph`; every producer updates both sides together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDataset {
  pub full_graph: DataGraph,
  pub node_rendering: BTreeMap<String, NodeRenderingData>,
  pub edge_rendering: BTreeMap<String, EdgeRenderingData>,
  pub node_fields: Vec<FieldModel>,
  pub edge_fields: Vec<FieldModel>,
  pub origin: DatasetOrigin,
}

impl Default for GraphDataset {
  fn default() -> Self {
    Self::from_graph(DataGraph::new(), DatasetOrigin::New)
  }
}

impl GraphDataset {
  /// Builds a dataset from a graph: one rendering entry per item (label
  /// copied from the `label` attribute) and field schemas inferred from the
  /// attributes present.
  pub fn from_graph(graph: DataGraph, origin: DatasetOrigin) -> Self {
    let node_rendering = graph
      .nodes
      .iter()
      .map(|(id, attributes)| {
        let data = NodeRenderingData {
          label: attributes.get("label").and_then(|v| v.as_text()).map(String::from),
          ..NodeRenderingData::default()
        };
        (id.clone(), data)
      })
      .collect();
    let edge_rendering = graph
      .edges
      .iter()
      .map(|(id, edge)| {
        let data = EdgeRenderingData {
          label: edge
            .attributes
            .get("label")
            .and_then(|v| v.as_text())
            .map(String::from),
          ..EdgeRenderingData::default()
        };
        (id.clone(), data)
      })
      .collect();
    let node_fields = infer_fields(graph.nodes.values());
    let edge_fields = infer_fields(graph.edges.values().map(|e| &e.attributes));
    Self {
      full_graph: graph,
      node_rendering,
      edge_rendering,
      node_fields,
      edge_fields,
      origin,
    }
  }

  /// Ordered fields for one item type.
  pub fn fields(&self, item_type: ItemType) -> &[FieldModel] {
    match item_type {
      ItemType::Nodes => &self.node_fields,
      ItemType::Edges => &self.edge_fields,
    }
  }

  pub fn field(&self, item_type: ItemType, id: &str) -> Option<&FieldModel> {
    self.fields(item_type).iter().find(|f| f.id == id)
  }
}

/// Infers one field per attribute id seen on any item: quantitative when
/// every non-null occurrence is numeric, qualitative otherwise.
fn infer_fields<'a>(items: impl Iterator<Item = &'a ItemData>) -> Vec<FieldModel> {
  let mut kinds: BTreeMap<String, FieldKind> = BTreeMap::new();
  for attributes in items {
    for (id, value) in attributes {
      let numeric = matches!(value, AttributeValue::Number(_) | AttributeValue::Null);
      kinds
        .entry(id.clone())
        .and_modify(|kind| {
          if !numeric {
            *kind = FieldKind::Qualitative;
          }
        })
        .or_insert(if numeric {
          FieldKind::Quantitative
        } else {
          FieldKind::Qualitative
        });
    }
  }
  kinds
    .into_iter()
    .map(|(id, kind)| FieldModel::new(id, kind))
    .collect()
}

/// Attribute writes produced by one metric run: attribute name → item id →
/// value. Items absent from a mapping keep their prior value.
pub type AttributeWrites = BTreeMap<String, BTreeMap<String, AttributeValue>>;

/// Producer: replace the whole dataset with one built from `graph`.
pub fn set_graph_dataset(graph: DataGraph, origin: DatasetOrigin) -> Transform<GraphDataset> {
  Box::new(move |_state| Ok(GraphDataset::from_graph(graph, origin)))
}

/// Producer: merge metric outputs into the full graph and the field schema
/// for `item_type`. Existing attributes are overwritten; new attribute names
/// are appended to the schema so later pickers see them.
pub fn merge_metric_outputs(
  item_type: ItemType,
  writes: AttributeWrites,
  kinds: BTreeMap<String, FieldKind>,
) -> Transform<GraphDataset> {
  Box::new(move |state| {
    let mut next = state.clone();
    for (attribute, per_item) in &writes {
      for (item_id, value) in per_item {
        let attributes = match item_type {
          ItemType::Nodes => next.full_graph.nodes.get_mut(item_id),
          ItemType::Edges => next
            .full_graph
            .edges
            .get_mut(item_id)
            .map(|e| &mut e.attributes),
        };
        match attributes {
          Some(attributes) => {
            attributes.insert(attribute.clone(), value.clone());
          }
          None => return Err(EngineError::UnknownItem(item_id.clone())),
        }
      }
      let fields = match item_type {
        ItemType::Nodes => &mut next.node_fields,
        ItemType::Edges => &mut next.edge_fields,
      };
      let kind = kinds.get(attribute).copied().unwrap_or(FieldKind::Category);
      match fields.iter_mut().find(|f| f.id == *attribute) {
        Some(existing) => existing.kind = kind,
        None => fields.push(FieldModel::new(attribute.clone(), kind)),
      }
    }
    Ok(next)
  })
}

/// Producer: overwrite node `x`/`y` from a layout mapping, preserving the
/// other rendering fields. Ids unknown to the graph are skipped with a
/// diagnostic; nodes absent from the mapping keep their coordinates.
pub fn overwrite_positions(
  positions: BTreeMap<String, crate::layouts::Coordinates>,
) -> Transform<GraphDataset> {
  Box::new(move |state| {
    let mut next = state.clone();
    for (id, coordinates) in &positions {
      match next.node_rendering.get_mut(id) {
        Some(data) => {
          data.x = coordinates.x;
          data.y = coordinates.y;
        }
        None => warn!(node = %id, "layout result references unknown node, skipping"),
      }
    }
    Ok(next)
  })
}
