//! Layout engine: descriptors, registry, sync layouts and worker supervisors.
//!
//! Layouts come in two kinds. Synchronous layouts are pure functions from a
//! graph to node coordinates, run to completion and merged in one action.
//! Worker layouts produce a [WorkerSupervisor] per invocation: an iterative
//! background simulation with a start/stop lifecycle that pushes coordinate
//! updates into the dataset on every iteration.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{DataGraph, EngineError, GraphDataset, ParameterMap, ParameterSpec};

mod algorithms;
#[cfg(test)]
mod algorithms_test;
mod engine;
#[cfg(test)]
mod engine_test;
mod script;
mod supervisor;
mod sync;
#[cfg(test)]
mod sync_test;

pub use algorithms::{ForceAlgorithm, IterativeLayout, NoverlapAlgorithm};
pub use engine::LayoutEngine;
pub use script::{coordinates_from_value, default_coordinates_script, default_threshold_script};
pub use supervisor::{PositionUpdate, WorkerSupervisor};

/// One node position produced by a layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub x: f64,
  pub y: f64,
}

/// Layout result: node id → position. Nodes absent from the mapping keep
/// their prior coordinates.
pub type LayoutMapping = BTreeMap<String, Coordinates>;

/// A one-shot layout: reads the graph, never mutates it. Deterministic only
/// for non-random layouts; random-seeded layouts may vary per call.
pub type SyncLayoutFn = fn(&DataGraph, &ParameterMap) -> Result<LayoutMapping, EngineError>;

/// Synchronous layout descriptor.
#[derive(Clone)]
pub struct SyncLayout {
  pub id: String,
  pub parameters: Vec<ParameterSpec>,
  pub run: SyncLayoutFn,
}

/// Builds a fresh iterative algorithm instance from a dataset snapshot and
/// resolved settings.
pub type AlgorithmFactory =
  fn(&GraphDataset, &ParameterMap) -> Result<Box<dyn IterativeLayout>, EngineError>;

/// Button-triggered settings preset (e.g. infer settings from graph
/// statistics before the next start).
#[derive(Clone)]
pub struct LayoutButton {
  pub id: String,
  pub get_settings: fn(&ParameterMap, &DataGraph) -> ParameterMap,
}

/// Worker layout descriptor; produces one supervisor per invocation.
#[derive(Clone)]
pub struct WorkerLayout {
  pub id: String,
  pub parameters: Vec<ParameterSpec>,
  pub buttons: Vec<LayoutButton>,
  pub algorithm: AlgorithmFactory,
}

/// A registered layout, tagged by kind.
#[derive(Clone)]
pub enum LayoutDescriptor {
  Sync(SyncLayout),
  Worker(WorkerLayout),
}

impl LayoutDescriptor {
  pub fn id(&self) -> &str {
    match self {
      Self::Sync(l) => &l.id,
      Self::Worker(l) => &l.id,
    }
  }

  pub fn parameters(&self) -> &[ParameterSpec] {
    match self {
      Self::Sync(l) => &l.parameters,
      Self::Worker(l) => &l.parameters,
    }
  }
}

/// Immutable process-wide layout registry, built once at startup.
pub static LAYOUTS: Lazy<Vec<LayoutDescriptor>> = Lazy::new(|| {
  vec![
    LayoutDescriptor::Sync(sync::random_layout()),
    LayoutDescriptor::Sync(script::anomaly_layout()),
    LayoutDescriptor::Sync(sync::circular_layout()),
    LayoutDescriptor::Sync(sync::circle_pack_layout()),
    LayoutDescriptor::Worker(algorithms::force_layout()),
    LayoutDescriptor::Worker(algorithms::noverlap_layout()),
    LayoutDescriptor::Sync(script::script_layout()),
  ]
});

/// Looks up a registered layout by id.
pub fn layout_by_id(id: &str) -> Result<&'static LayoutDescriptor, EngineError> {
  LAYOUTS
    .iter()
    .find(|l| l.id() == id)
    .ok_or_else(|| EngineError::UnknownDescriptor(id.to_string()))
}
