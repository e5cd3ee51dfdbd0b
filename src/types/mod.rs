//! Core data model: attribute values, the full graph, the shared dataset,
//! field schemas, parameter declarations and the engine error taxonomy.

mod attribute;
mod data_graph;
mod dataset;
mod error;
mod field;
mod parameter;
#[cfg(test)]
mod parameter_test;

pub use attribute::{AttributeValue, ItemData};
pub use data_graph::{DataGraph, EdgeRecord, GraphSnapshot, edge_weight};
pub use dataset::{
  AttributeWrites, DatasetOrigin, EdgeRenderingData, GraphDataset, NodeRenderingData,
  merge_metric_outputs, overwrite_positions, set_graph_dataset,
};
pub use error::EngineError;
pub use field::{FieldKind, FieldModel, ItemType};
pub use parameter::{
  ParameterMap, ParameterSpec, ParameterValue, ScriptArgs, ScriptCheck, ScriptFn,
  resolve_parameters, validate_parameters,
};
