//! Viewport controller: frames the camera over the rendered graph.
//!
//! A thin consumer of rendering data at the core's boundary. The renderer
//! reports its live bounding box through [ViewportController::set_renderer_box];
//! camera resets read either that or the dataset coordinates. Animation
//! mechanics live in the renderer, not here.

use tracing::debug;

use crate::store::Atom;
use crate::types::{EngineError, GraphDataset};

/// Camera position, zoom ratio and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
  pub x: f64,
  pub y: f64,
  pub ratio: f64,
  pub angle: f64,
}

impl Default for CameraState {
  fn default() -> Self {
    Self {
      x: 0.0,
      y: 0.0,
      ratio: 1.0,
      angle: 0.0,
    }
  }
}

/// Where to take the bounding box from when resetting the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsSource {
  /// Recompute from dataset coordinates.
  Dataset,
  /// Use the renderer's live reported box.
  Renderer,
}

/// Axis-aligned bounding box of visible nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  pub min_x: f64,
  pub min_y: f64,
  pub max_x: f64,
  pub max_y: f64,
}

impl BoundingBox {
  pub fn center(&self) -> (f64, f64) {
    (
      (self.min_x + self.max_x) / 2.0,
      (self.min_y + self.max_y) / 2.0,
    )
  }

  pub fn extent(&self) -> (f64, f64) {
    (self.max_x - self.min_x, self.max_y - self.min_y)
  }
}

/// Bounding box of non-hidden nodes in the dataset, when any.
pub fn dataset_bounding_box(dataset: &GraphDataset) -> Option<BoundingBox> {
  let mut bounds: Option<BoundingBox> = None;
  for data in dataset.node_rendering.values() {
    if data.hidden {
      continue;
    }
    bounds = Some(match bounds {
      None => BoundingBox {
        min_x: data.x,
        min_y: data.y,
        max_x: data.x,
        max_y: data.y,
      },
      Some(b) => BoundingBox {
        min_x: b.min_x.min(data.x),
        min_y: b.min_y.min(data.y),
        max_x: b.max_x.max(data.x),
        max_y: b.max_y.max(data.y),
      },
    });
  }
  bounds
}

/// Frames the camera over the dataset held in the injected atoms.
pub struct ViewportController {
  camera: Atom<CameraState>,
  dataset: Atom<GraphDataset>,
  viewport_width: f64,
  viewport_height: f64,
  renderer_box: Option<BoundingBox>,
}

impl ViewportController {
  pub fn new(
    camera: Atom<CameraState>,
    dataset: Atom<GraphDataset>,
    viewport_width: f64,
    viewport_height: f64,
  ) -> Self {
    Self {
      camera,
      dataset,
      viewport_width,
      viewport_height,
      renderer_box: None,
    }
  }

  /// Stores the renderer's live bounding box (camera/viewport event input).
  pub fn set_renderer_box(&mut self, bounds: BoundingBox) {
    self.renderer_box = Some(bounds);
  }

  /// Recomputes a bounding box and resets pan/zoom/angle over it.
  ///
  /// `source` picks the box: the renderer's live one when an iterative
  /// layout has the freshest coordinates, the dataset right after a sync
  /// layout. Subscribers on the camera atom observe the reset immediately,
  /// so no separate refresh signal exists.
  pub fn reset_camera(&self, source: BoundsSource) {
    let dataset_box = || dataset_bounding_box(&self.dataset.get());
    let bounds = match source {
      BoundsSource::Dataset => dataset_box(),
      BoundsSource::Renderer => self.renderer_box.or_else(dataset_box),
    };
    let Some(bounds) = bounds else {
      debug!("reset_camera on empty graph, keeping defaults");
      self.camera.set(CameraState::default());
      return;
    };
    let (x, y) = bounds.center();
    let (width, height) = bounds.extent();
    let ratio = (width / self.viewport_width)
      .max(height / self.viewport_height)
      .max(f64::MIN_POSITIVE);
    self.camera.set(CameraState {
      x,
      y,
      ratio,
      angle: 0.0,
    });
  }

  /// Centers on one node with a zoom ratio proportional to its size
  /// relative to the viewport dimensions.
  pub fn focus_on_node(&self, id: &str) -> Result<(), EngineError> {
    let dataset = self.dataset.get();
    let data = dataset
      .node_rendering
      .get(id)
      .ok_or_else(|| EngineError::UnknownItem(id.to_string()))?;
    let ratio = focus_ratio(data.size, self.viewport_width, self.viewport_height);
    self.camera.set(CameraState {
      x: data.x,
      y: data.y,
      ratio,
      angle: self.camera.get().angle,
    });
    Ok(())
  }

  /// Centers on an edge's midpoint, zoomed proportionally to its size.
  pub fn focus_on_edge(&self, id: &str) -> Result<(), EngineError> {
    let dataset = self.dataset.get();
    let edge = dataset
      .full_graph
      .edges
      .get(id)
      .ok_or_else(|| EngineError::UnknownItem(id.to_string()))?;
    let source = dataset
      .node_rendering
      .get(&edge.source)
      .ok_or_else(|| EngineError::UnknownItem(edge.source.clone()))?;
    let target = dataset
      .node_rendering
      .get(&edge.target)
      .ok_or_else(|| EngineError::UnknownItem(edge.target.clone()))?;
    let size = dataset
      .edge_rendering
      .get(id)
      .map(|d| d.size)
      .unwrap_or(1.0);
    let ratio = focus_ratio(size, self.viewport_width, self.viewport_height);
    self.camera.set(CameraState {
      x: (source.x + target.x) / 2.0,
      y: (source.y + target.y) / 2.0,
      ratio,
      angle: self.camera.get().angle,
    });
    Ok(())
  }

  pub fn camera(&self) -> CameraState {
    self.camera.get()
  }
}

/// Zoom ratio making an item of `size` occupy a fixed share of the smaller
/// viewport dimension.
fn focus_ratio(size: f64, viewport_width: f64, viewport_height: f64) -> f64 {
  const FOCUS_SHARE: f64 = 0.1;
  let reference = viewport_width.min(viewport_height).max(1.0);
  (size.max(1.0) / (reference * FOCUS_SHARE)).max(f64::MIN_POSITIVE)
}
