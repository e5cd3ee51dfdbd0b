//! Built-in one-shot layouts: random, circular, circle-pack.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{
  AttributeValue, DataGraph, EngineError, FieldKind, ItemType, ParameterMap, ParameterSpec,
};

use super::{Coordinates, LayoutMapping, SyncLayout};

fn number_setting(settings: &ParameterMap, id: &str, default: f64) -> f64 {
  settings
    .get(id)
    .and_then(|v| v.as_number())
    .unwrap_or(default)
}

/// Uniform random positions: each coordinate lies in
/// `[center - scale/2, center + scale/2]`. An optional `seed` setting makes
/// the draw deterministic.
pub fn random_layout() -> SyncLayout {
  SyncLayout {
    id: "random".to_string(),
    parameters: vec![
      ParameterSpec::number("center", 0.5),
      ParameterSpec::number("scale", 1000.0),
      ParameterSpec::number("seed", f64::NAN),
    ],
    run: run_random,
  }
}

fn run_random(graph: &DataGraph, settings: &ParameterMap) -> Result<LayoutMapping, EngineError> {
  let center = number_setting(settings, "center", 0.5);
  let scale = number_setting(settings, "scale", 1000.0);
  let seed = settings.get("seed").and_then(|v| v.as_number());
  let mut rng = match seed {
    Some(seed) if seed.is_finite() => StdRng::seed_from_u64(seed as u64),
    _ => StdRng::from_entropy(),
  };
  let mut mapping = BTreeMap::new();
  for id in graph.node_ids() {
    mapping.insert(
      id.clone(),
      Coordinates {
        x: center + (rng.gen_range(0.0..1.0) - 0.5) * scale,
        y: center + (rng.gen_range(0.0..1.0) - 0.5) * scale,
      },
    );
  }
  Ok(mapping)
}

/// Nodes evenly spaced on a circle of radius `scale` centered at `center`.
pub fn circular_layout() -> SyncLayout {
  SyncLayout {
    id: "circular".to_string(),
    parameters: vec![
      ParameterSpec::Number {
        id: "center".to_string(),
        default: 0.0,
        required: false,
        min: None,
        step: Some(1.0),
      },
      ParameterSpec::number("scale", 1000.0),
    ],
    run: run_circular,
  }
}

fn run_circular(graph: &DataGraph, settings: &ParameterMap) -> Result<LayoutMapping, EngineError> {
  let center = number_setting(settings, "center", 0.0);
  let scale = number_setting(settings, "scale", 1000.0);
  let order = graph.order().max(1) as f64;
  let mapping = graph
    .node_ids()
    .enumerate()
    .map(|(index, id)| {
      let angle = TAU * index as f64 / order;
      (
        id.clone(),
        Coordinates {
          x: center + scale * angle.cos(),
          y: center + scale * angle.sin(),
        },
      )
    })
    .collect();
  Ok(mapping)
}

/// Circle-pack layout: nodes grouped by an optional qualitative attribute,
/// groups placed on a sunflower spiral, members on a smaller spiral inside
/// their group. Deterministic.
pub fn circle_pack_layout() -> SyncLayout {
  SyncLayout {
    id: "circlePack".to_string(),
    parameters: vec![
      ParameterSpec::Attribute {
        id: "groupingField".to_string(),
        item_type: ItemType::Nodes,
        restriction: Some(FieldKind::Qualitative),
        required: false,
      },
      ParameterSpec::Number {
        id: "center".to_string(),
        default: 0.5,
        required: false,
        min: None,
        step: Some(0.1),
      },
      ParameterSpec::number("scale", 1.0),
    ],
    run: run_circle_pack,
  }
}

// Golden angle, in radians.
const PHI: f64 = 2.399_963_229_728_653;

fn run_circle_pack(
  graph: &DataGraph,
  settings: &ParameterMap,
) -> Result<LayoutMapping, EngineError> {
  let center = number_setting(settings, "center", 0.5);
  let scale = number_setting(settings, "scale", 1.0);
  let grouping = settings.get("groupingField").and_then(|v| v.as_text());

  let mut groups: BTreeMap<String, Vec<&String>> = BTreeMap::new();
  for (id, attributes) in &graph.nodes {
    let key = grouping
      .and_then(|field| attributes.get(field))
      .map(render_group_key)
      .unwrap_or_default();
    groups.entry(key).or_default().push(id);
  }

  let group_spacing = (graph.order() as f64).sqrt().max(1.0);
  let mut mapping = BTreeMap::new();
  for (group_index, members) in groups.into_values().enumerate() {
    let group_radius = group_spacing * (group_index as f64).sqrt();
    let group_angle = PHI * group_index as f64;
    let (gx, gy) = (group_radius * group_angle.cos(), group_radius * group_angle.sin());
    for (member_index, id) in members.into_iter().enumerate() {
      let radius = (member_index as f64).sqrt();
      let angle = PHI * member_index as f64;
      mapping.insert(
        id.clone(),
        Coordinates {
          x: center + scale * (gx + radius * angle.cos()),
          y: center + scale * (gy + radius * angle.sin()),
        },
      );
    }
  }
  Ok(mapping)
}

fn render_group_key(value: &AttributeValue) -> String {
  match value {
    AttributeValue::Text(s) => s.clone(),
    AttributeValue::Number(n) => n.to_string(),
    AttributeValue::Boolean(b) => b.to_string(),
    AttributeValue::Null => String::new(),
  }
}
