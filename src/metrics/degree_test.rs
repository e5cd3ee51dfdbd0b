//! Tests for the degree metric.

use std::collections::HashMap;

use crate::types::{AttributeValue, DataGraph, ParameterMap, ParameterValue};

use super::degree::degree_metric;

fn weighted(weight: f64) -> HashMap<String, AttributeValue> {
  let mut attrs = HashMap::new();
  attrs.insert("weight".to_string(), AttributeValue::Number(weight));
  attrs
}

fn path() -> DataGraph {
  let mut g = DataGraph::new();
  for id in ["a", "b", "c"] {
    g.add_node(id, HashMap::new());
  }
  g.add_edge("ab", "a", "b", weighted(2.0)).unwrap();
  g.add_edge("bc", "b", "c", weighted(3.0)).unwrap();
  g
}

fn run(parameters: &ParameterMap) -> std::collections::BTreeMap<String, AttributeValue> {
  let descriptor = degree_metric();
  (descriptor.compute)(parameters, &path()).unwrap()["degree"].clone()
}

#[test]
fn total_degree_counts_both_endpoints() {
  let values = run(&ParameterMap::new());
  assert_eq!(values["a"], AttributeValue::Number(1.0));
  assert_eq!(values["b"], AttributeValue::Number(2.0));
  assert_eq!(values["c"], AttributeValue::Number(1.0));
}

#[test]
fn directed_modes_split_source_and_target() {
  let mut parameters = ParameterMap::new();
  parameters.insert("direction".to_string(), ParameterValue::Text("in".into()));
  let values = run(&parameters);
  assert_eq!(values["a"], AttributeValue::Number(0.0));
  assert_eq!(values["b"], AttributeValue::Number(1.0));

  parameters.insert("direction".to_string(), ParameterValue::Text("out".into()));
  let values = run(&parameters);
  assert_eq!(values["a"], AttributeValue::Number(1.0));
  assert_eq!(values["c"], AttributeValue::Number(0.0));
}

#[test]
fn weighted_degree_reads_the_chosen_attribute() {
  let mut parameters = ParameterMap::new();
  parameters.insert(
    "edgeWeight".to_string(),
    ParameterValue::Attribute("weight".to_string()),
  );
  let values = run(&parameters);
  assert_eq!(values["b"], AttributeValue::Number(5.0));
}

#[test]
fn covers_every_node_including_isolated_ones() {
  let mut g = path();
  g.add_node("isolated", HashMap::new());
  let descriptor = degree_metric();
  let outputs = (descriptor.compute)(&ParameterMap::new(), &g).unwrap();
  assert_eq!(outputs["degree"]["isolated"], AttributeValue::Number(0.0));
  assert_eq!(outputs["degree"].len(), 4);
}
