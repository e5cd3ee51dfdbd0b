//! Worker layout supervisor: start/stop lifecycle around an iterative
//! simulation running on a background task.
//!
//! The simulation task owns its algorithm instance and communicates with
//! the main context exclusively through messages: a watch channel carries
//! the stop command in, an mpsc channel carries one immutable
//! [PositionUpdate] per iteration out. A companion apply task writes each
//! update into the dataset atom through the position producer, so every
//! iteration is visible to subscribers (push model) and the atom stays the
//! single mutation path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::store::{Atom, producer_to_action};
use crate::types::{EngineError, GraphDataset, ParameterMap, overwrite_positions};

use super::{AlgorithmFactory, LayoutMapping, WorkerLayout};

/// Immutable coordinate message emitted by one simulation iteration.
/// Later updates overwrite earlier ones for the same node (last write wins).
#[derive(Debug, Clone)]
pub struct PositionUpdate {
  pub positions: LayoutMapping,
}

/// Delay between simulation iterations.
const ITERATION_INTERVAL: Duration = Duration::from_millis(10);

/// Stateful controller for one worker layout instance.
///
/// Lifecycle: created → running → stopped. `stop` is idempotent and safe at
/// any time, including before `start` and twice in a row. A supervisor that
/// reaches its algorithm's convergence criterion self-terminates and
/// reports `is_running() == false`.
pub struct WorkerSupervisor {
  layout_id: String,
  algorithm: AlgorithmFactory,
  dataset: Atom<GraphDataset>,
  running: Arc<AtomicBool>,
  stop_tx: Option<watch::Sender<bool>>,
}

impl WorkerSupervisor {
  /// Creates a supervisor for `layout`, bound to the live dataset atom.
  pub fn new(layout: &WorkerLayout, dataset: Atom<GraphDataset>) -> Self {
    Self {
      layout_id: layout.id.clone(),
      algorithm: layout.algorithm,
      dataset,
      running: Arc::new(AtomicBool::new(false)),
      stop_tx: None,
    }
  }

  /// Begins iterative coordinate updates. A supervisor already running is
  /// stopped first, so at most one simulation writes per supervisor.
  pub fn start(&mut self, settings: &ParameterMap) -> Result<(), EngineError> {
    self.stop();

    let mut algorithm = (self.algorithm)(&self.dataset.get(), settings)?;
    let (stop_tx, stop_rx) = watch::channel(false);
    let stop_apply = stop_rx.clone();
    let (update_tx, mut update_rx) = mpsc::channel::<PositionUpdate>(16);
    // Fresh flag per run: a lingering task from a previous run clearing its
    // own flag must not clobber the new one.
    self.running = Arc::new(AtomicBool::new(true));
    let running = Arc::clone(&self.running);
    info!(layout = %self.layout_id, "starting worker layout");

    let layout_id = self.layout_id.clone();
    tokio::spawn(async move {
      loop {
        if *stop_rx.borrow() {
          break;
        }
        if algorithm.converged() {
          debug!(layout = %layout_id, "worker layout converged");
          break;
        }
        let update = PositionUpdate {
          positions: algorithm.step(),
        };
        if update_tx.send(update).await.is_err() {
          break;
        }
        tokio::time::sleep(ITERATION_INTERVAL).await;
      }
      running.store(false, Ordering::SeqCst);
    });

    let apply = producer_to_action(overwrite_positions, self.dataset.clone());
    tokio::spawn(async move {
      while let Some(update) = update_rx.recv().await {
        // Updates still buffered when stop lands are stale: once `stop`
        // returns, nothing from this run may write the dataset again.
        if *stop_apply.borrow() {
          break;
        }
        if let Err(e) = apply(update.positions) {
          warn!(error = %e, "failed to apply worker layout update");
        }
      }
    });

    self.stop_tx = Some(stop_tx);
    Ok(())
  }

  /// Halts updates and releases the background tasks. No-op when the
  /// supervisor never started or already stopped.
  pub fn stop(&mut self) {
    if let Some(stop_tx) = self.stop_tx.take() {
      let _ = stop_tx.send(true);
      info!(layout = %self.layout_id, "stopping worker layout");
    }
    self.running.store(false, Ordering::SeqCst);
  }

  /// Whether the simulation task is currently iterating.
  pub fn is_running(&self) -> bool {
    self.running.load(Ordering::SeqCst)
  }

  pub fn layout_id(&self) -> &str {
    &self.layout_id
  }
}

impl Drop for WorkerSupervisor {
  fn drop(&mut self) {
    self.stop();
  }
}
