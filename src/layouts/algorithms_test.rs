//! Tests for the iterative layout algorithms.

use std::collections::HashMap;

use crate::types::{DataGraph, DatasetOrigin, GraphDataset, ParameterMap};

use super::algorithms::{ForceAlgorithm, IterativeLayout, NoverlapAlgorithm, force_layout};

fn positioned_dataset(positions: &[(&str, f64, f64)]) -> GraphDataset {
  let mut g = DataGraph::new();
  for (id, _, _) in positions {
    g.add_node(*id, HashMap::new());
  }
  let mut dataset = GraphDataset::from_graph(g, DatasetOrigin::New);
  for (id, x, y) in positions {
    let rendering = dataset.node_rendering.get_mut(*id).unwrap();
    rendering.x = *x;
    rendering.y = *y;
  }
  dataset
}

#[test]
fn force_pulls_connected_nodes_together() {
  let mut dataset = positioned_dataset(&[("a", -100.0, 0.0), ("b", 100.0, 0.0)]);
  let mut g = dataset.full_graph.clone();
  g.add_edge("ab", "a", "b", HashMap::new()).unwrap();
  dataset.full_graph = g;

  let mut algorithm = ForceAlgorithm::new(&dataset, &ParameterMap::new());
  let mut distance = 200.0;
  for _ in 0..100 {
    let mapping = algorithm.step();
    distance = (mapping["a"].x - mapping["b"].x).abs();
  }
  assert!(distance < 200.0, "nodes failed to approach: {distance}");
}

#[test]
fn force_pushes_disconnected_nodes_apart() {
  let dataset = positioned_dataset(&[("a", -1.0, 0.0), ("b", 1.0, 0.0)]);
  let mut algorithm = ForceAlgorithm::new(&dataset, &ParameterMap::new());
  let mut distance = 2.0;
  for _ in 0..10 {
    let mapping = algorithm.step();
    distance = (mapping["a"].x - mapping["b"].x).abs();
  }
  assert!(distance > 2.0, "nodes failed to separate: {distance}");
}

#[test]
fn force_step_covers_every_node() {
  let dataset = positioned_dataset(&[("a", 0.0, 0.0), ("b", 1.0, 1.0), ("c", 2.0, 2.0)]);
  let mut algorithm = ForceAlgorithm::new(&dataset, &ParameterMap::new());
  assert_eq!(algorithm.step().len(), 3);
  assert!(!algorithm.converged());
}

#[test]
fn auto_settings_scale_with_graph_size() {
  let layout = force_layout();
  let button = &layout.buttons[0];
  assert_eq!(button.id, "autoSettings");

  let mut g = DataGraph::new();
  for i in 0..100 {
    g.add_node(format!("n{i}"), HashMap::new());
  }
  let inferred = (button.get_settings)(&ParameterMap::new(), &g);
  let repulsion = inferred["repulsion"].as_number().unwrap();
  assert!(repulsion > 0.1, "repulsion should grow with order: {repulsion}");
}

#[test]
fn noverlap_separates_overlapping_nodes_then_converges() {
  let dataset = positioned_dataset(&[("a", 0.0, 0.0), ("b", 1.0, 0.0), ("c", 0.0, 1.0)]);
  let mut algorithm = NoverlapAlgorithm::new(&dataset, &ParameterMap::new());
  let mut last = algorithm.step();
  for _ in 0..500 {
    if algorithm.converged() {
      break;
    }
    last = algorithm.step();
  }
  assert!(algorithm.converged(), "noverlap never converged");
  for (i, p) in last.values().enumerate() {
    for q in last.values().skip(i + 1) {
      let distance = ((p.x - q.x).powi(2) + (p.y - q.y).powi(2)).sqrt();
      assert!(distance >= 2.0 + 5.0, "nodes still overlap: {distance}");
    }
  }
}

#[test]
fn noverlap_with_spread_nodes_converges_immediately() {
  let dataset = positioned_dataset(&[("a", 0.0, 0.0), ("b", 100.0, 0.0)]);
  let mut algorithm = NoverlapAlgorithm::new(&dataset, &ParameterMap::new());
  let mapping = algorithm.step();
  assert!(algorithm.converged());
  assert_eq!(mapping["a"].x, 0.0);
  assert_eq!(mapping["b"].x, 100.0);
}
