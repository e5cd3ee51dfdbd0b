//! Tests for the disparity metric.

use std::collections::HashMap;

use crate::types::{AttributeValue, DataGraph, ParameterMap, ParameterValue};

use super::disparity::disparity_metric;

fn weighted(weight: f64) -> HashMap<String, AttributeValue> {
  let mut attrs = HashMap::new();
  attrs.insert("w".to_string(), AttributeValue::Number(weight));
  attrs
}

#[test]
fn pendant_edge_with_degree_one_endpoints_is_undefined() {
  let mut g = DataGraph::new();
  g.add_node("p1", HashMap::new());
  g.add_node("p2", HashMap::new());
  g.add_edge("pendant", "p1", "p2", HashMap::new()).unwrap();
  let descriptor = disparity_metric();
  let outputs = (descriptor.compute)(&ParameterMap::new(), &g).unwrap();
  assert_eq!(outputs["disparity"]["pendant"], AttributeValue::Null);
}

#[test]
fn hub_edges_receive_a_score_in_unit_range() {
  let mut g = DataGraph::new();
  for id in ["hub", "s1", "s2", "s3"] {
    g.add_node(id, HashMap::new());
  }
  g.add_edge("e1", "hub", "s1", weighted(1.0)).unwrap();
  g.add_edge("e2", "hub", "s2", weighted(1.0)).unwrap();
  g.add_edge("e3", "hub", "s3", weighted(8.0)).unwrap();

  let mut parameters = ParameterMap::new();
  parameters.insert(
    "getEdgeWeight".to_string(),
    ParameterValue::Attribute("w".to_string()),
  );
  let descriptor = disparity_metric();
  let outputs = (descriptor.compute)(&parameters, &g).unwrap();
  let alpha = |id: &str| outputs["disparity"][id].as_number().unwrap();
  for id in ["e1", "e2", "e3"] {
    assert!((0.0..=1.0).contains(&alpha(id)), "alpha out of range for {id}");
  }
  // The dominant edge is more significant (lower alpha) than the weak ones.
  assert!(alpha("e3") < alpha("e1"));
  assert_eq!(alpha("e1"), alpha("e2"));
}

#[test]
fn self_loops_are_undefined() {
  let mut g = DataGraph::new();
  g.add_node("a", HashMap::new());
  g.add_node("b", HashMap::new());
  g.add_node("c", HashMap::new());
  g.add_edge("loop", "a", "a", HashMap::new()).unwrap();
  g.add_edge("ab", "a", "b", HashMap::new()).unwrap();
  g.add_edge("ac", "a", "c", HashMap::new()).unwrap();
  let descriptor = disparity_metric();
  let outputs = (descriptor.compute)(&ParameterMap::new(), &g).unwrap();
  assert_eq!(outputs["disparity"]["loop"], AttributeValue::Null);
  assert!(matches!(outputs["disparity"]["ab"], AttributeValue::Number(_)));
}

#[test]
fn parallel_edges_share_the_collapsed_score() {
  let mut g = DataGraph::new();
  for id in ["a", "b", "c"] {
    g.add_node(id, HashMap::new());
  }
  g.add_edge("ab1", "a", "b", HashMap::new()).unwrap();
  g.add_edge("ab2", "a", "b", HashMap::new()).unwrap();
  g.add_edge("ac", "a", "c", HashMap::new()).unwrap();
  let descriptor = disparity_metric();
  let outputs = (descriptor.compute)(&ParameterMap::new(), &g).unwrap();
  assert_eq!(outputs["disparity"]["ab1"], outputs["disparity"]["ab2"]);
}
