//! Attribute values carried by graph nodes and edges.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::FieldKind;

/// A single node/edge attribute value.
///
/// `Null` is a real value: metrics may produce it for items where the
/// algorithm defines no result (e.g. disparity on low-degree edges).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
  Null,
  Boolean(bool),
  Number(f64),
  Text(String),
}

/// Attributes of one node or edge.
pub type ItemData = HashMap<String, AttributeValue>;

impl AttributeValue {
  pub fn is_null(&self) -> bool {
    matches!(self, Self::Null)
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      Self::Number(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Boolean(b) => Some(*b),
      _ => None,
    }
  }

  /// Whether this value satisfies the given field kind constraint.
  /// `Null` always passes: undefined outputs are allowed everywhere.
  pub fn matches_kind(&self, kind: FieldKind) -> bool {
    match kind {
      FieldKind::Quantitative => matches!(self, Self::Number(_) | Self::Null),
      FieldKind::Qualitative => {
        matches!(self, Self::Text(_) | Self::Boolean(_) | Self::Null)
      }
      FieldKind::Category => true,
    }
  }

  /// Converts a JSON value produced by a user script. Objects and arrays
  /// have no attribute representation and are rejected by callers.
  pub fn from_json(value: &serde_json::Value) -> Option<Self> {
    match value {
      serde_json::Value::Null => Some(Self::Null),
      serde_json::Value::Bool(b) => Some(Self::Boolean(*b)),
      serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
      serde_json::Value::String(s) => Some(Self::Text(s.clone())),
      _ => None,
    }
  }

  pub fn to_json(&self) -> serde_json::Value {
    match self {
      Self::Null => serde_json::Value::Null,
      Self::Boolean(b) => serde_json::Value::Bool(*b),
      Self::Number(n) => serde_json::json!(n),
      Self::Text(s) => serde_json::Value::String(s.clone()),
    }
  }
}

impl From<f64> for AttributeValue {
  fn from(n: f64) -> Self {
    Self::Number(n)
  }
}

impl From<&str> for AttributeValue {
  fn from(s: &str) -> Self {
    Self::Text(s.to_string())
  }
}

impl From<String> for AttributeValue {
  fn from(s: String) -> Self {
    Self::Text(s)
  }
}

impl From<bool> for AttributeValue {
  fn from(b: bool) -> Self {
    Self::Boolean(b)
  }
}
