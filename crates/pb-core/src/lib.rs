pub mod config;
pub mod data;
pub mod geometry;
pub mod model;
pub mod style;

pub use config::{BreakoutConfig, Cta, DESKTOP_MIN_WIDTH, is_desktop_width};
pub use data::{HotspotRecord, InitialData};
pub use geometry::{Container, Placement, hotspot_center_pixel, relative_center};
pub use model::*;

// Re-export kurbo types so downstream crates share one geometry vocabulary
pub use kurbo::{Line, Point, Rect, Size, Vec2};
