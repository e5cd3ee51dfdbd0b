//! Field descriptors for node/edge attribute schemas.

use serde::{Deserialize, Serialize};

/// Which item collection a field, metric or parameter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
  Nodes,
  Edges,
}

/// Statistical kind of an attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
  /// Numeric values (or null where undefined).
  Quantitative,
  /// Discrete textual/boolean values.
  Qualitative,
  /// Free-form values of any type.
  Category,
}

/// One attribute schema entry; `node_fields`/`edge_fields` keep these in
/// declaration order so attribute pickers list them stably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldModel {
  pub id: String,
  pub kind: FieldKind,
}

impl FieldModel {
  pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
    Self {
      id: id.into(),
      kind,
    }
  }
}
