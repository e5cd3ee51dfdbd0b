//! Tests for the one-shot layouts.

use std::collections::HashMap;

use crate::types::{AttributeValue, DataGraph, ParameterMap, ParameterValue};

use super::sync::{circle_pack_layout, circular_layout, random_layout};

fn grid_graph(n: usize) -> DataGraph {
  let mut g = DataGraph::new();
  for i in 0..n {
    g.add_node(format!("n{i}"), HashMap::new());
  }
  g
}

fn settings(pairs: &[(&str, f64)]) -> ParameterMap {
  pairs
    .iter()
    .map(|(k, v)| (k.to_string(), ParameterValue::Number(*v)))
    .collect()
}

#[test]
fn random_covers_every_node_within_bounds() {
  let graph = grid_graph(50);
  let layout = random_layout();
  let settings = settings(&[("center", 100.0), ("scale", 10.0), ("seed", 7.0)]);
  let mapping = (layout.run)(&graph, &settings).unwrap();
  assert_eq!(mapping.len(), graph.order());
  for (id, c) in &mapping {
    for coordinate in [c.x, c.y] {
      assert!(
        (95.0..=105.0).contains(&coordinate),
        "{id} out of bounds: {coordinate}"
      );
    }
  }
}

#[test]
fn random_is_deterministic_under_a_seed() {
  let graph = grid_graph(10);
  let layout = random_layout();
  let settings = settings(&[("seed", 42.0)]);
  let first = (layout.run)(&graph, &settings).unwrap();
  let second = (layout.run)(&graph, &settings).unwrap();
  assert_eq!(first, second);
}

#[test]
fn circular_spaces_nodes_on_the_circle() {
  let graph = grid_graph(4);
  let layout = circular_layout();
  let settings = settings(&[("center", 0.0), ("scale", 100.0)]);
  let mapping = (layout.run)(&graph, &settings).unwrap();
  assert_eq!(mapping.len(), 4);
  for c in mapping.values() {
    let radius = (c.x * c.x + c.y * c.y).sqrt();
    assert!((radius - 100.0).abs() < 1e-9);
  }
}

#[test]
fn circle_pack_groups_nodes_by_attribute() {
  let mut g = DataGraph::new();
  for (id, group) in [("a", "x"), ("b", "x"), ("c", "y"), ("d", "y")] {
    let mut attrs = HashMap::new();
    attrs.insert("group".to_string(), AttributeValue::Text(group.to_string()));
    g.add_node(id, attrs);
  }
  let layout = circle_pack_layout();
  let mut settings = settings(&[("center", 0.0), ("scale", 1.0)]);
  settings.insert(
    "groupingField".to_string(),
    ParameterValue::Attribute("group".to_string()),
  );
  let mapping = (layout.run)(&g, &settings).unwrap();
  assert_eq!(mapping.len(), 4);

  let distance = |p: &str, q: &str| {
    let (p, q) = (&mapping[p], &mapping[q]);
    ((p.x - q.x).powi(2) + (p.y - q.y).powi(2)).sqrt()
  };
  // Same-group nodes sit closer than the two group anchors.
  assert!(distance("a", "b") <= distance("a", "c") + distance("c", "d"));
}

#[test]
fn empty_graph_yields_empty_mapping() {
  let layout = random_layout();
  let mapping = (layout.run)(&DataGraph::new(), &ParameterMap::new()).unwrap();
  assert!(mapping.is_empty());
}

proptest::proptest! {
  #[test]
  fn random_respects_arbitrary_bounds(
    center in -1e6f64..1e6,
    scale in 0.0f64..1e6,
    seed in 0.0f64..1e9,
  ) {
    let graph = grid_graph(5);
    let layout = random_layout();
    let settings = settings(&[("center", center), ("scale", scale), ("seed", seed)]);
    let mapping = (layout.run)(&graph, &settings).unwrap();
    for c in mapping.values() {
      let half = scale / 2.0;
      proptest::prop_assert!(c.x >= center - half && c.x <= center + half);
      proptest::prop_assert!(c.y >= center - half && c.y <= center + half);
    }
  }
}
