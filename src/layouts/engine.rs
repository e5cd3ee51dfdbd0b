//! Layout engine: validates settings, runs sync layouts through the
//! position producer, and supervises worker layouts.

use tracing::info;

use crate::store::{Atom, producer_to_action};
use crate::types::{
  EngineError, GraphDataset, ParameterMap, overwrite_positions, resolve_parameters,
  validate_parameters,
};

use super::{LayoutDescriptor, WorkerSupervisor, layout_by_id};

/// Per-dataset layout coordinator.
///
/// Owns the single running worker supervisor for its dataset: starting any
/// worker layout while another runs stops the previous one first, so no two
/// iterative processes ever write coordinates concurrently.
pub struct LayoutEngine {
  dataset: Atom<GraphDataset>,
  current: Option<WorkerSupervisor>,
}

impl LayoutEngine {
  pub fn new(dataset: Atom<GraphDataset>) -> Self {
    Self {
      dataset,
      current: None,
    }
  }

  /// Runs a synchronous layout and merges its result into the rendering
  /// data (x/y only) through one action.
  pub fn apply_sync(&self, layout_id: &str, settings: &ParameterMap) -> Result<(), EngineError> {
    let LayoutDescriptor::Sync(layout) = layout_by_id(layout_id)? else {
      return Err(EngineError::computation(
        layout_id,
        "not a synchronous layout",
      ));
    };
    let dataset = self.dataset.get();
    validate_parameters(layout_id, &layout.parameters, settings, &dataset)?;
    let settings = resolve_parameters(&layout.parameters, settings);
    let positions = (layout.run)(&dataset.full_graph, &settings)?;
    info!(layout = %layout_id, nodes = positions.len(), "applying sync layout");
    producer_to_action(overwrite_positions, self.dataset.clone())(positions)
  }

  /// Starts a worker layout. Any supervisor currently running for this
  /// dataset is stopped first.
  pub fn start_worker(
    &mut self,
    layout_id: &str,
    settings: &ParameterMap,
  ) -> Result<(), EngineError> {
    let LayoutDescriptor::Worker(layout) = layout_by_id(layout_id)? else {
      return Err(EngineError::computation(layout_id, "not a worker layout"));
    };
    let dataset = self.dataset.get();
    validate_parameters(layout_id, &layout.parameters, settings, &dataset)?;
    let settings = resolve_parameters(&layout.parameters, settings);

    if let Some(previous) = self.current.as_mut() {
      previous.stop();
    }
    let mut supervisor = WorkerSupervisor::new(layout, self.dataset.clone());
    supervisor.start(&settings)?;
    self.current = Some(supervisor);
    Ok(())
  }

  /// Stops the running worker layout, if any. Idempotent.
  pub fn stop_worker(&mut self) {
    if let Some(supervisor) = self.current.as_mut() {
      supervisor.stop();
    }
  }

  /// Whether a worker supervisor is currently iterating.
  pub fn worker_running(&self) -> bool {
    self.current.as_ref().is_some_and(WorkerSupervisor::is_running)
  }

  /// Id of the supervisor currently held by the engine (running or not).
  pub fn current_worker(&self) -> Option<&str> {
    self.current.as_ref().map(WorkerSupervisor::layout_id)
  }

  /// Applies a layout button preset: recomputes settings from the current
  /// settings and graph statistics (used before the next `start`).
  pub fn button_settings(
    &self,
    layout_id: &str,
    button_id: &str,
    current: &ParameterMap,
  ) -> Result<ParameterMap, EngineError> {
    let LayoutDescriptor::Worker(layout) = layout_by_id(layout_id)? else {
      return Err(EngineError::computation(layout_id, "not a worker layout"));
    };
    let button = layout
      .buttons
      .iter()
      .find(|b| b.id == button_id)
      .ok_or_else(|| EngineError::UnknownDescriptor(format!("{layout_id}:{button_id}")))?;
    Ok((button.get_settings)(current, &self.dataset.get().full_graph))
  }
}
