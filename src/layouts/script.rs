//! Script-driven layouts: the free-form `script` layout and the
//! threshold-based `anomaly` layout.
//!
//! Both run synchronously over a frozen graph copy, one user-function call
//! per node. A missing script (or threshold) is a soft failure: one
//! diagnostic line and an empty mapping, never an error — nodes simply keep
//! their prior coordinates. This is deliberately laxer than the metric
//! engine, where an incomplete result would corrupt derived statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;
use serde_json::{Value, json};
use tracing::warn;

use crate::types::{
  AttributeValue, DataGraph, EngineError, GraphSnapshot, ItemData, ParameterMap, ParameterSpec,
  ScriptArgs, ScriptFn,
};

use super::{Coordinates, LayoutMapping, SyncLayout};

const CANVAS: f64 = 1000.0;
const MARGIN: f64 = 50.0;

const COORDINATES_DOC: &str = r#"/**
 * Function that returns coordinates for the specified node.
 *
 * @param {string} id The ID of the node
 * @param {Object.<string, number | string | boolean | null>} attributes Attributes of the node
 * @param {number} index The index position of the node in the graph
 * @param {Graph} graph Read-only snapshot of the full graph
 * @returns {x: number, y: number} The computed coordinates of the node
 */"#;

const THRESHOLD_DOC: &str = r#"/**
 * Function that returns coordinates for the specified node.
 *
 * @param {string} id The ID of the node
 * @param {Object.<string, number | string | boolean | null>} attributes Attributes of the node
 * @param {number} index The index position of the node in the graph
 * @param {Graph} graph Read-only snapshot of the full graph
 * @param {number} threshold The threshold value from user input
 * @returns {x: number, y: number} The computed coordinates
 */"#;

/// Default node-coordinates script: nodes labelled `Anomaly` land in the
/// left half of the canvas, `Normal` in the right half, anything else
/// anywhere; `y` is uniform within the margins.
pub fn default_coordinates_script() -> ScriptFn {
  Arc::new(|_id, attributes, _index, _graph, _args| {
    let mut rng = rand::thread_rng();
    let half = CANVAS / 2.0;
    let x = match attributes.get("label").and_then(AttributeValue::as_text) {
      Some("Anomaly") => MARGIN + rng.gen_range(0.0..1.0) * (half - 2.0 * MARGIN),
      Some("Normal") => half + MARGIN + rng.gen_range(0.0..1.0) * (half - 2.0 * MARGIN),
      _ => MARGIN + rng.gen_range(0.0..1.0) * (CANVAS - 2.0 * MARGIN),
    };
    let y = MARGIN + rng.gen_range(0.0..1.0) * (CANVAS - 2.0 * MARGIN);
    Ok(json!({ "x": x, "y": y }))
  })
}

/// Default threshold script. The node label is read as a number, with
/// `"Anomaly"` mapped to 1 and `"Normal"` to 0; values strictly above the
/// threshold land in the left half of the canvas, values at or below in the
/// right half, non-numeric labels anywhere.
pub fn default_threshold_script() -> ScriptFn {
  Arc::new(|id, attributes, _index, _graph, args| {
    let threshold = args.first().and_then(Value::as_f64).ok_or_else(|| {
      EngineError::script(format!("threshold argument missing for node `{id}`"))
    })?;
    let label_value = match attributes.get("label") {
      Some(AttributeValue::Number(n)) => Some(*n),
      Some(AttributeValue::Text(s)) => match s.as_str() {
        "Anomaly" => Some(1.0),
        "Normal" => Some(0.0),
        other => other.parse::<f64>().ok(),
      },
      _ => None,
    };
    let mut rng = rand::thread_rng();
    let half = CANVAS / 2.0;
    let x = match label_value {
      Some(v) if v > threshold => MARGIN + rng.gen_range(0.0..1.0) * (half - 2.0 * MARGIN),
      Some(_) => half + MARGIN + rng.gen_range(0.0..1.0) * (half - 2.0 * MARGIN),
      None => MARGIN + rng.gen_range(0.0..1.0) * (CANVAS - 2.0 * MARGIN),
    };
    let y = MARGIN + rng.gen_range(0.0..1.0) * (CANVAS - 2.0 * MARGIN);
    Ok(json!({ "x": x, "y": y }))
  })
}

/// Extracts `{x, y}` from a script result, rejecting malformed shapes.
pub fn coordinates_from_value(id: &str, value: &Value) -> Result<Coordinates, EngineError> {
  let object = value
    .as_object()
    .ok_or_else(|| EngineError::script(format!("script must return an object for node `{id}`")))?;
  let coordinate = |key: &str| {
    object.get(key).and_then(Value::as_f64).ok_or_else(|| {
      EngineError::script(format!("script result is missing a numeric `{key}` for node `{id}`"))
    })
  };
  Ok(Coordinates {
    x: coordinate("x")?,
    y: coordinate("y")?,
  })
}

/// Script check shared by both layouts: run against one sample node and
/// reject results without numeric `x`/`y` before any node is processed.
fn check_coordinates(script: &ScriptFn, graph: &GraphSnapshot) -> Result<(), EngineError> {
  let Some(id) = graph.node_ids().next() else {
    return Ok(());
  };
  let attributes = graph
    .node_attributes(id)
    .cloned()
    .unwrap_or_default();
  let result = script(id, &attributes, 0, graph, &vec![json!(0.0)])?;
  coordinates_from_value(id, &result).map(|_| ())
}

/// The free-form script layout.
pub fn script_layout() -> SyncLayout {
  SyncLayout {
    id: "script".to_string(),
    parameters: vec![ParameterSpec::Script {
      id: "script".to_string(),
      function_doc: COORDINATES_DOC,
      default: Some(default_coordinates_script()),
      check: Some(check_coordinates),
    }],
    run: run_script,
  }
}

fn run_script(graph: &DataGraph, settings: &ParameterMap) -> Result<LayoutMapping, EngineError> {
  let Some(script) = settings.get("script").and_then(|v| v.as_script()) else {
    warn!(layout = "script", "no script configured, skipping layout");
    return Ok(BTreeMap::new());
  };
  run_per_node(graph, script, &Vec::new())
}

/// The threshold-based anomaly layout.
pub fn anomaly_layout() -> SyncLayout {
  SyncLayout {
    id: "anomaly".to_string(),
    parameters: vec![
      ParameterSpec::Number {
        id: "threshold".to_string(),
        default: 0.0,
        required: true,
        min: None,
        step: None,
      },
      ParameterSpec::Script {
        id: "script".to_string(),
        function_doc: THRESHOLD_DOC,
        default: Some(default_threshold_script()),
        check: Some(check_coordinates),
      },
    ],
    run: run_anomaly,
  }
}

fn run_anomaly(graph: &DataGraph, settings: &ParameterMap) -> Result<LayoutMapping, EngineError> {
  let script = settings.get("script").and_then(|v| v.as_script());
  let threshold = settings.get("threshold").and_then(|v| v.as_number());
  let (Some(script), Some(threshold)) = (script, threshold) else {
    warn!(layout = "anomaly", "missing script or threshold, skipping layout");
    return Ok(BTreeMap::new());
  };
  run_per_node(graph, script, &vec![json!(threshold)])
}

/// Calls the script once per node against a frozen graph copy and collects
/// the resulting coordinates.
fn run_per_node(
  graph: &DataGraph,
  script: &ScriptFn,
  args: &ScriptArgs,
) -> Result<LayoutMapping, EngineError> {
  let snapshot = graph.snapshot();
  let empty = ItemData::new();
  let mut mapping = BTreeMap::new();
  for (index, id) in graph.node_ids().enumerate() {
    let attributes = graph.nodes.get(id).unwrap_or(&empty);
    let result = script(id, attributes, index, &snapshot, args)?;
    mapping.insert(id.clone(), coordinates_from_value(id, &result)?);
  }
  Ok(mapping)
}
