//! Layout: measurement service, constraints, and the composition engine

mod engine;
mod measure;

pub use engine::{Composition, LayoutConstraints};
pub use measure::{FontMetrics, Measure};
