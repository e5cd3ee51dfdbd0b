//! Iterative layout algorithms driven by worker supervisors.
//!
//! The numerical internals here are replaceable; the engine only relies on
//! the [IterativeLayout] contract (step/converged). Algorithms own their own
//! position state, seeded from a dataset snapshot at start, and never touch
//! the live dataset: each step returns an immutable mapping that the
//! supervisor ships back as a message.

use std::collections::HashMap;

use crate::types::{GraphDataset, ParameterMap, ParameterSpec};

use super::{Coordinates, LayoutButton, LayoutMapping, WorkerLayout};

/// One iterative simulation instance.
pub trait IterativeLayout: Send {
  /// Advances the simulation by one iteration and returns the updated
  /// positions for every node.
  fn step(&mut self) -> LayoutMapping;

  /// True once the algorithm reached its convergence criterion; the
  /// supervisor then self-terminates.
  fn converged(&self) -> bool {
    false
  }
}

fn number_setting(settings: &ParameterMap, id: &str, default: f64) -> f64 {
  settings
    .get(id)
    .and_then(|v| v.as_number())
    .unwrap_or(default)
}

/// Simple force-directed simulation: pairwise repulsion, attraction along
/// edges, gravity towards the origin, inertia-damped movement clamped to
/// `maxMove` per iteration. Runs until stopped.
pub struct ForceAlgorithm {
  ids: Vec<String>,
  edges: Vec<(usize, usize)>,
  positions: Vec<Coordinates>,
  velocities: Vec<Coordinates>,
  attraction: f64,
  repulsion: f64,
  gravity: f64,
  inertia: f64,
  max_move: f64,
}

impl ForceAlgorithm {
  pub fn new(dataset: &GraphDataset, settings: &ParameterMap) -> Self {
    let ids: Vec<String> = dataset.full_graph.node_ids().cloned().collect();
    let index: HashMap<&String, usize> = ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let edges = dataset
      .full_graph
      .edges
      .values()
      .filter_map(|e| Some((*index.get(&e.source)?, *index.get(&e.target)?)))
      .collect();
    let positions = ids
      .iter()
      .map(|id| {
        dataset
          .node_rendering
          .get(id)
          .map(|d| Coordinates { x: d.x, y: d.y })
          .unwrap_or(Coordinates { x: 0.0, y: 0.0 })
      })
      .collect();
    let velocities = vec![Coordinates { x: 0.0, y: 0.0 }; ids.len()];
    Self {
      ids,
      edges,
      positions,
      velocities,
      attraction: number_setting(settings, "attraction", 0.0005),
      repulsion: number_setting(settings, "repulsion", 0.1),
      gravity: number_setting(settings, "gravity", 0.0001),
      inertia: number_setting(settings, "inertia", 0.6),
      max_move: number_setting(settings, "maxMove", 200.0),
    }
  }
}

impl IterativeLayout for ForceAlgorithm {
  fn step(&mut self) -> LayoutMapping {
    let n = self.ids.len();
    let mut forces = vec![Coordinates { x: 0.0, y: 0.0 }; n];

    for i in 0..n {
      for j in (i + 1)..n {
        let dx = self.positions[i].x - self.positions[j].x;
        let dy = self.positions[i].y - self.positions[j].y;
        let squared = (dx * dx + dy * dy).max(1e-6);
        let push = self.repulsion / squared;
        forces[i].x += dx * push;
        forces[i].y += dy * push;
        forces[j].x -= dx * push;
        forces[j].y -= dy * push;
      }
      forces[i].x -= self.positions[i].x * self.gravity;
      forces[i].y -= self.positions[i].y * self.gravity;
    }
    for &(source, target) in &self.edges {
      if source == target {
        continue;
      }
      let dx = self.positions[target].x - self.positions[source].x;
      let dy = self.positions[target].y - self.positions[source].y;
      forces[source].x += dx * self.attraction;
      forces[source].y += dy * self.attraction;
      forces[target].x -= dx * self.attraction;
      forces[target].y -= dy * self.attraction;
    }

    for i in 0..n {
      let mut vx = self.velocities[i].x * self.inertia + forces[i].x;
      let mut vy = self.velocities[i].y * self.inertia + forces[i].y;
      let movement = (vx * vx + vy * vy).sqrt();
      if movement > self.max_move {
        let clamp = self.max_move / movement;
        vx *= clamp;
        vy *= clamp;
      }
      self.velocities[i] = Coordinates { x: vx, y: vy };
      self.positions[i].x += vx;
      self.positions[i].y += vy;
    }

    self
      .ids
      .iter()
      .cloned()
      .zip(self.positions.iter().copied())
      .collect()
  }
}

/// The `force` worker layout descriptor.
pub fn force_layout() -> WorkerLayout {
  WorkerLayout {
    id: "force".to_string(),
    parameters: vec![
      ParameterSpec::Number {
        id: "attraction".to_string(),
        default: 0.0005,
        required: false,
        min: Some(0.0),
        step: Some(0.0001),
      },
      ParameterSpec::Number {
        id: "repulsion".to_string(),
        default: 0.1,
        required: false,
        min: Some(0.0),
        step: Some(0.1),
      },
      ParameterSpec::Number {
        id: "gravity".to_string(),
        default: 0.0001,
        required: false,
        min: Some(0.0),
        step: Some(0.0001),
      },
      ParameterSpec::Number {
        id: "inertia".to_string(),
        default: 0.6,
        required: false,
        min: Some(0.0),
        step: Some(0.1),
      },
      ParameterSpec::number("maxMove", 200.0),
    ],
    buttons: vec![LayoutButton {
      id: "autoSettings".to_string(),
      get_settings: infer_force_settings,
    }],
    algorithm: |dataset, settings| Ok(Box::new(ForceAlgorithm::new(dataset, settings))),
  }
}

/// Recomputes force defaults from graph statistics (node/edge counts):
/// denser graphs get stronger repulsion and gravity.
fn infer_force_settings(
  current: &ParameterMap,
  graph: &crate::types::DataGraph,
) -> ParameterMap {
  use crate::types::ParameterValue;
  let order = graph.order().max(1) as f64;
  let density = graph.size() as f64 / order;
  let mut settings = current.clone();
  settings.insert(
    "repulsion".to_string(),
    ParameterValue::Number(0.1 * order.ln().max(1.0)),
  );
  settings.insert(
    "gravity".to_string(),
    ParameterValue::Number(0.0001 * (1.0 + density)),
  );
  settings
}

/// Overlap-removal simulation: pushes apart nodes whose discs (rendering
/// size × `ratio` + `margin`) intersect. Converges once an iteration moves
/// nothing.
pub struct NoverlapAlgorithm {
  ids: Vec<String>,
  positions: Vec<Coordinates>,
  sizes: Vec<f64>,
  margin: f64,
  ratio: f64,
  speed: f64,
  expansion: f64,
  converged: bool,
}

impl NoverlapAlgorithm {
  pub fn new(dataset: &GraphDataset, settings: &ParameterMap) -> Self {
    let ids: Vec<String> = dataset.full_graph.node_ids().cloned().collect();
    let positions = ids
      .iter()
      .map(|id| {
        dataset
          .node_rendering
          .get(id)
          .map(|d| Coordinates { x: d.x, y: d.y })
          .unwrap_or(Coordinates { x: 0.0, y: 0.0 })
      })
      .collect();
    let sizes = ids
      .iter()
      .map(|id| dataset.node_rendering.get(id).map(|d| d.size).unwrap_or(1.0))
      .collect();
    Self {
      ids,
      positions,
      sizes,
      margin: number_setting(settings, "margin", 5.0),
      ratio: number_setting(settings, "ratio", 1.0),
      speed: number_setting(settings, "speed", 3.0),
      expansion: number_setting(settings, "expansion", 1.1),
      converged: false,
    }
  }
}

impl IterativeLayout for NoverlapAlgorithm {
  fn step(&mut self) -> LayoutMapping {
    let n = self.ids.len();
    let mut moved = false;
    for i in 0..n {
      for j in (i + 1)..n {
        let dx = self.positions[j].x - self.positions[i].x;
        let dy = self.positions[j].y - self.positions[i].y;
        let distance = (dx * dx + dy * dy).sqrt();
        let minimum = (self.sizes[i] + self.sizes[j]) * self.ratio + self.margin;
        if distance >= minimum {
          continue;
        }
        moved = true;
        // Coincident nodes are separated along x to break the tie.
        let (ux, uy) = if distance > 1e-9 {
          (dx / distance, dy / distance)
        } else {
          (1.0, 0.0)
        };
        let shift = (minimum * self.expansion - distance) / 2.0 * self.speed.clamp(0.1, 1.0);
        self.positions[i].x -= ux * shift;
        self.positions[i].y -= uy * shift;
        self.positions[j].x += ux * shift;
        self.positions[j].y += uy * shift;
      }
    }
    self.converged = !moved;
    self
      .ids
      .iter()
      .cloned()
      .zip(self.positions.iter().copied())
      .collect()
  }

  fn converged(&self) -> bool {
    self.converged
  }
}

/// The `noverlap` worker layout descriptor.
pub fn noverlap_layout() -> WorkerLayout {
  WorkerLayout {
    id: "noverlap".to_string(),
    parameters: vec![
      ParameterSpec::number("gridSize", 20.0),
      ParameterSpec::number("margin", 5.0),
      ParameterSpec::Number {
        id: "expansion".to_string(),
        default: 1.1,
        required: false,
        min: None,
        step: Some(0.1),
      },
      ParameterSpec::number("ratio", 1.0),
      ParameterSpec::number("speed", 3.0),
    ],
    buttons: vec![],
    algorithm: |dataset, settings| Ok(Box::new(NoverlapAlgorithm::new(dataset, settings))),
  }
}
