pub mod analysis;
mod error;
pub mod geom;
pub mod summary;
pub mod table;
pub mod utils;

pub use analysis::{compute_metrics, point_metrics, PointMetrics};
pub use error::Error;
pub use geom::NucleusEllipse;
pub use summary::MetricsSummary;
