//! Parameter declarations shared by metric and layout descriptors,
//! plus resolution and validation of caller-supplied values.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{EngineError, FieldKind, GraphDataset, GraphSnapshot, ItemData, ItemType};

/// Extra positional arguments forwarded to a script after the fixed
/// `(id, attributes, index, graph)` prefix (e.g. the anomaly threshold).
pub type ScriptArgs = Vec<serde_json::Value>;

/// A user-supplied executable script.
///
/// Receives `(id, attributes, index, graph, extra_args)` where `graph` is a
/// read-only [GraphSnapshot]: scripts can never mutate the live dataset.
/// Returns JSON so malformed shapes stay representable and checkable.
pub type ScriptFn = Arc<
  dyn Fn(&str, &ItemData, usize, &GraphSnapshot, &ScriptArgs) -> Result<serde_json::Value, EngineError>
    + Send
    + Sync,
>;

/// Validator run once against a sample node before a script is accepted.
/// Must return a descriptive [EngineError::ScriptContract] on a bad shape.
pub type ScriptCheck = fn(&ScriptFn, &GraphSnapshot) -> Result<(), EngineError>;

/// Declaration of one metric/layout parameter, consumed by forms.
#[derive(Clone)]
pub enum ParameterSpec {
  Number {
    id: String,
    default: f64,
    required: bool,
    min: Option<f64>,
    step: Option<f64>,
  },
  Boolean {
    id: String,
    default: bool,
    required: bool,
  },
  Enum {
    id: String,
    default: String,
    values: Vec<String>,
    required: bool,
  },
  /// Picks an attribute field of the given item type; `restriction` narrows
  /// the picker to fields of one kind.
  Attribute {
    id: String,
    item_type: ItemType,
    restriction: Option<FieldKind>,
    required: bool,
  },
  Script {
    id: String,
    /// JsDoc-style contract shown in the script editor.
    function_doc: &'static str,
    default: Option<ScriptFn>,
    check: Option<ScriptCheck>,
  },
}

impl ParameterSpec {
  pub fn number(id: &str, default: f64) -> Self {
    Self::Number {
      id: id.to_string(),
      default,
      required: false,
      min: None,
      step: None,
    }
  }

  pub fn id(&self) -> &str {
    match self {
      Self::Number { id, .. }
      | Self::Boolean { id, .. }
      | Self::Enum { id, .. }
      | Self::Attribute { id, .. }
      | Self::Script { id, .. } => id,
    }
  }

  pub fn required(&self) -> bool {
    match self {
      Self::Number { required, .. }
      | Self::Boolean { required, .. }
      | Self::Enum { required, .. }
      | Self::Attribute { required, .. } => *required,
      Self::Script { .. } => false,
    }
  }

  /// Declared default, when the parameter has one.
  pub fn default_value(&self) -> Option<ParameterValue> {
    match self {
      Self::Number { default, .. } => Some(ParameterValue::Number(*default)),
      Self::Boolean { default, .. } => Some(ParameterValue::Boolean(*default)),
      Self::Enum { default, .. } => Some(ParameterValue::Text(default.clone())),
      Self::Attribute { .. } => None,
      Self::Script { default, .. } => default.clone().map(ParameterValue::Script),
    }
  }
}

impl fmt::Debug for ParameterSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ParameterSpec({})", self.id())
  }
}

/// A caller-chosen parameter value.
#[derive(Clone)]
pub enum ParameterValue {
  Null,
  Number(f64),
  Boolean(bool),
  Text(String),
  /// Name of a picked attribute field.
  Attribute(String),
  Script(ScriptFn),
}

impl ParameterValue {
  pub fn is_null(&self) -> bool {
    matches!(self, Self::Null)
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      Self::Number(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Boolean(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) | Self::Attribute(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_script(&self) -> Option<&ScriptFn> {
    match self {
      Self::Script(f) => Some(f),
      _ => None,
    }
  }

  /// JSON rendering for session persistence; scripts have none.
  pub fn to_json(&self) -> Option<serde_json::Value> {
    match self {
      Self::Null => Some(serde_json::Value::Null),
      Self::Number(n) => Some(serde_json::json!(n)),
      Self::Boolean(b) => Some(serde_json::json!(b)),
      Self::Text(s) | Self::Attribute(s) => Some(serde_json::json!(s)),
      Self::Script(_) => None,
    }
  }
}

impl fmt::Debug for ParameterValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => write!(f, "Null"),
      Self::Number(n) => write!(f, "Number({n})"),
      Self::Boolean(b) => write!(f, "Boolean({b})"),
      Self::Text(s) => write!(f, "Text({s:?})"),
      Self::Attribute(s) => write!(f, "Attribute({s:?})"),
      Self::Script(_) => write!(f, "Script(<fn>)"),
    }
  }
}

/// Chosen parameter values keyed by parameter id.
pub type ParameterMap = HashMap<String, ParameterValue>;

/// Fills declared defaults for parameters absent from `values`.
pub fn resolve_parameters(specs: &[ParameterSpec], values: &ParameterMap) -> ParameterMap {
  let mut resolved = values.clone();
  for spec in specs {
    if !resolved.contains_key(spec.id())
      && let Some(default) = spec.default_value()
    {
      resolved.insert(spec.id().to_string(), default);
    }
  }
  resolved
}

/// Validates caller-supplied values against the declared specs.
///
/// Required parameters are checked on the raw `values` (a default does not
/// satisfy `required`). Attribute parameters must name an existing field of
/// the right item type and kind. Script checks run once against a sample
/// node before the script is accepted; on an empty graph the check is
/// skipped since there is nothing to sample.
pub fn validate_parameters(
  owner: &str,
  specs: &[ParameterSpec],
  values: &ParameterMap,
  dataset: &GraphDataset,
) -> Result<(), EngineError> {
  for spec in specs {
    let raw = values.get(spec.id());
    if spec.required() && raw.is_none_or(ParameterValue::is_null) {
      return Err(EngineError::validation(
        owner,
        spec.id(),
        "required parameter is missing",
      ));
    }
    let Some(value) = raw else {
      continue;
    };
    if value.is_null() {
      continue;
    }
    match spec {
      ParameterSpec::Number { min, .. } => {
        let Some(n) = value.as_number() else {
          return Err(EngineError::validation(owner, spec.id(), "expected a number"));
        };
        if let Some(min) = min
          && n < *min
        {
          return Err(EngineError::validation(
            owner,
            spec.id(),
            format!("value {n} is below the minimum {min}"),
          ));
        }
      }
      ParameterSpec::Boolean { .. } => {
        if value.as_bool().is_none() {
          return Err(EngineError::validation(owner, spec.id(), "expected a boolean"));
        }
      }
      ParameterSpec::Enum { values: allowed, .. } => {
        let ok = value
          .as_text()
          .is_some_and(|v| allowed.iter().any(|a| a == v));
        if !ok {
          return Err(EngineError::validation(
            owner,
            spec.id(),
            format!("expected one of {allowed:?}"),
          ));
        }
      }
      ParameterSpec::Attribute {
        item_type,
        restriction,
        ..
      } => {
        let Some(field_id) = value.as_text() else {
          return Err(EngineError::validation(
            owner,
            spec.id(),
            "expected an attribute name",
          ));
        };
        let Some(field) = dataset.field(*item_type, field_id) else {
          return Err(EngineError::validation(
            owner,
            spec.id(),
            format!("unknown {item_type:?} field `{field_id}`"),
          ));
        };
        if let Some(required_kind) = restriction
          && field.kind != *required_kind
        {
          return Err(EngineError::validation(
            owner,
            spec.id(),
            format!("field `{field_id}` is not {required_kind:?}"),
          ));
        }
      }
      ParameterSpec::Script { check, .. } => {
        let Some(script) = value.as_script() else {
          return Err(EngineError::validation(owner, spec.id(), "expected a script"));
        };
        if let Some(check) = check
          && dataset.full_graph.order() > 0
        {
          check(script, &dataset.full_graph.snapshot())?;
        }
      }
    }
  }
  Ok(())
}
