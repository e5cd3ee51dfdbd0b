//! Tests for the layout engine.

use std::collections::HashMap;
use std::time::Duration;

use crate::store::Atom;
use crate::types::{
  DataGraph, DatasetOrigin, EngineError, GraphDataset, ParameterMap, ParameterValue,
};

use super::engine::LayoutEngine;

fn triangle_atom() -> Atom<GraphDataset> {
  let mut g = DataGraph::new();
  for id in ["a", "b", "c"] {
    g.add_node(id, HashMap::new());
  }
  g.add_edge("ab", "a", "b", HashMap::new()).unwrap();
  g.add_edge("bc", "b", "c", HashMap::new()).unwrap();
  let mut dataset = GraphDataset::from_graph(g, DatasetOrigin::New);
  for (id, x, y) in [("a", -10.0, 0.0), ("b", 10.0, 0.0), ("c", 0.0, 15.0)] {
    let rendering = dataset.node_rendering.get_mut(id).unwrap();
    rendering.x = x;
    rendering.y = y;
  }
  Atom::new(dataset)
}

#[test]
fn apply_sync_writes_coordinates_and_keeps_the_rest() {
  let atom = triangle_atom();
  let engine = LayoutEngine::new(atom.clone());
  engine.apply_sync("circular", &ParameterMap::new()).unwrap();

  let dataset = atom.get();
  let a = &dataset.node_rendering["a"];
  let radius = (a.x * a.x + a.y * a.y).sqrt();
  assert!((radius - 1000.0).abs() < 1e-9);
  // Rendering fields other than coordinates are untouched.
  assert_eq!(a.size, 1.0);
  assert!(!a.hidden);
}

#[test]
fn apply_sync_rejects_worker_layouts() {
  let engine = LayoutEngine::new(triangle_atom());
  let err = engine.apply_sync("force", &ParameterMap::new()).unwrap_err();
  assert!(matches!(err, EngineError::Computation { .. }));
}

#[test]
fn unknown_layout_id_is_reported() {
  let engine = LayoutEngine::new(triangle_atom());
  let err = engine.apply_sync("nope", &ParameterMap::new()).unwrap_err();
  assert!(matches!(err, EngineError::UnknownDescriptor(id) if id == "nope"));
}

#[tokio::test]
async fn only_one_worker_runs_per_dataset() {
  let mut engine = LayoutEngine::new(triangle_atom());
  engine.start_worker("force", &ParameterMap::new()).unwrap();
  engine.start_worker("force", &ParameterMap::new()).unwrap();
  assert!(engine.worker_running());
  assert_eq!(engine.current_worker(), Some("force"));

  engine.stop_worker();
  assert!(!engine.worker_running());
}

#[tokio::test]
async fn failed_start_keeps_the_previous_worker_running() {
  let mut engine = LayoutEngine::new(triangle_atom());
  engine.start_worker("force", &ParameterMap::new()).unwrap();

  let mut settings = ParameterMap::new();
  settings.insert("repulsion".to_string(), ParameterValue::Number(-1.0));
  let err = engine.start_worker("force", &settings).unwrap_err();
  assert!(err.is_validation());
  assert!(engine.worker_running());
  engine.stop_worker();
}

#[tokio::test]
async fn stop_worker_without_a_worker_is_a_no_op() {
  let mut engine = LayoutEngine::new(triangle_atom());
  engine.stop_worker();
  engine.stop_worker();
  assert!(!engine.worker_running());
}

#[tokio::test]
async fn worker_updates_reach_subscribers() {
  let atom = triangle_atom();
  let before: Vec<(f64, f64)> = atom
    .get()
    .node_rendering
    .values()
    .map(|d| (d.x, d.y))
    .collect();
  let mut engine = LayoutEngine::new(atom.clone());
  engine.start_worker("force", &ParameterMap::new()).unwrap();
  tokio::time::sleep(Duration::from_millis(100)).await;
  engine.stop_worker();

  let after: Vec<(f64, f64)> = atom
    .get()
    .node_rendering
    .values()
    .map(|d| (d.x, d.y))
    .collect();
  assert_ne!(before, after, "worker iterations never reached the dataset");
}

#[tokio::test]
async fn sync_layout_after_stop_is_not_overwritten() {
  let atom = triangle_atom();
  let mut engine = LayoutEngine::new(atom.clone());
  engine.start_worker("force", &ParameterMap::new()).unwrap();
  tokio::time::sleep(Duration::from_millis(50)).await;
  engine.stop_worker();

  engine.apply_sync("circular", &ParameterMap::new()).unwrap();
  let framed: Vec<(f64, f64)> = atom
    .get()
    .node_rendering
    .values()
    .map(|d| (d.x, d.y))
    .collect();
  tokio::time::sleep(Duration::from_millis(50)).await;
  let later: Vec<(f64, f64)> = atom
    .get()
    .node_rendering
    .values()
    .map(|d| (d.x, d.y))
    .collect();
  assert_eq!(framed, later, "stale worker updates overwrote the sync layout");
}

#[test]
fn button_settings_recompute_force_defaults() {
  let engine = LayoutEngine::new(triangle_atom());
  let settings = engine
    .button_settings("force", "autoSettings", &ParameterMap::new())
    .unwrap();
  assert!(settings["repulsion"].as_number().unwrap() > 0.0);

  let err = engine
    .button_settings("force", "nope", &ParameterMap::new())
    .unwrap_err();
  assert!(matches!(err, EngineError::UnknownDescriptor(_)));
}
