//! Tests for parameter resolution and validation.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use super::{
  AttributeValue, DataGraph, DatasetOrigin, EngineError, FieldKind, GraphDataset, ItemType,
  ParameterMap, ParameterSpec, ParameterValue, ScriptFn, resolve_parameters, validate_parameters,
};

fn dataset_with_fields() -> GraphDataset {
  let mut g = DataGraph::new();
  let mut attrs = HashMap::new();
  attrs.insert("weight".to_string(), AttributeValue::Number(1.0));
  attrs.insert("kind".to_string(), AttributeValue::Text("x".into()));
  g.add_node("n1", attrs);
  GraphDataset::from_graph(g, DatasetOrigin::New)
}

fn specs() -> Vec<ParameterSpec> {
  vec![
    ParameterSpec::Number {
      id: "threshold".to_string(),
      default: 0.0,
      required: true,
      min: Some(0.0),
      step: None,
    },
    ParameterSpec::Attribute {
      id: "field".to_string(),
      item_type: ItemType::Nodes,
      restriction: Some(FieldKind::Quantitative),
      required: false,
    },
  ]
}

#[test]
fn required_parameter_must_be_present_in_raw_values() {
  let err = validate_parameters("owner", &specs(), &ParameterMap::new(), &dataset_with_fields())
    .unwrap_err();
  match err {
    EngineError::Validation { parameter, .. } => assert_eq!(parameter, "threshold"),
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[test]
fn null_does_not_satisfy_required() {
  let mut values = ParameterMap::new();
  values.insert("threshold".to_string(), ParameterValue::Null);
  let err =
    validate_parameters("owner", &specs(), &values, &dataset_with_fields()).unwrap_err();
  assert!(err.is_validation());
}

#[test]
fn number_below_minimum_is_rejected() {
  let mut values = ParameterMap::new();
  values.insert("threshold".to_string(), ParameterValue::Number(-1.0));
  let err =
    validate_parameters("owner", &specs(), &values, &dataset_with_fields()).unwrap_err();
  assert!(err.is_validation());
}

#[test]
fn attribute_must_exist_and_match_restriction() {
  let dataset = dataset_with_fields();
  let mut values = ParameterMap::new();
  values.insert("threshold".to_string(), ParameterValue::Number(1.0));
  values.insert("field".to_string(), ParameterValue::Attribute("missing".into()));
  assert!(validate_parameters("owner", &specs(), &values, &dataset).is_err());

  values.insert("field".to_string(), ParameterValue::Attribute("kind".into()));
  assert!(
    validate_parameters("owner", &specs(), &values, &dataset).is_err(),
    "qualitative field rejected by quantitative restriction"
  );

  values.insert("field".to_string(), ParameterValue::Attribute("weight".into()));
  assert!(validate_parameters("owner", &specs(), &values, &dataset).is_ok());
}

#[test]
fn script_check_runs_before_acceptance() {
  let script: ScriptFn = Arc::new(|_, _, _, _, _| Ok(json!({ "x": 1.0 })));
  let spec = vec![ParameterSpec::Script {
    id: "script".to_string(),
    function_doc: "",
    default: None,
    check: Some(|script, graph| {
      let id = graph.node_ids().next().unwrap();
      let result = script(id, &HashMap::new(), 0, graph, &Vec::new())?;
      if result.get("y").is_none() {
        return Err(EngineError::script("missing y"));
      }
      Ok(())
    }),
  }];
  let mut values = ParameterMap::new();
  values.insert("script".to_string(), ParameterValue::Script(script));
  let err =
    validate_parameters("owner", &spec, &values, &dataset_with_fields()).unwrap_err();
  assert!(matches!(err, EngineError::ScriptContract { .. }));
}

#[test]
fn resolve_fills_defaults_without_overriding() {
  let mut values = ParameterMap::new();
  values.insert("threshold".to_string(), ParameterValue::Number(5.0));
  let resolved = resolve_parameters(&specs(), &values);
  assert_eq!(resolved["threshold"].as_number(), Some(5.0));
  // Attribute parameters have no default.
  assert!(!resolved.contains_key("field"));
}
