pub mod exposure;
pub mod geom;
pub mod observer;
pub mod sky;
pub mod solar;

// Prelude
pub use exposure::{ExposureConfig, ExposureReport, run_exposure};
pub use geom::building::{Building, load_buildings};
pub use geom::point::Point;
pub use observer::{MapFrame, Observer, Window};
pub use sky::roof::Roof;
pub use sky::silhouette::{Cliff, Silhouette};
