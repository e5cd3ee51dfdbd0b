//! # graphbench
//!
//! In-memory graph analysis workbench core: a reactive dataset store, a
//! metric engine and a layout engine behind one uniform descriptor
//! abstraction.
//!
//! ## Architecture
//!
//! The graph dataset lives in an [store::Atom] and is only ever mutated
//! through producers/actions (see `store`). Metrics and layouts are
//! declared as immutable descriptors in process-wide registries
//! ([metrics::METRICS], [layouts::LAYOUTS]); the engines validate
//! parameters, execute the computation (synchronously, or iteratively on a
//! background worker), and merge results back through a single action so
//! subscribers observe every change.

pub mod cloud;
pub mod dataset_io;
pub mod filters;
pub mod layouts;
pub mod metrics;
pub mod session;
pub mod store;
pub mod types;
pub mod viewport;

pub use layouts::{LAYOUTS, LayoutEngine, layout_by_id};
pub use metrics::{METRICS, compute_metric, metric_by_id};
pub use store::{Atom, producer_to_action};
pub use types::{EngineError, GraphDataset};
