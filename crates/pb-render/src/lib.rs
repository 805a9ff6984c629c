pub mod guides;

pub use guides::{GuidelineRenderer, LineStyle, LineSurface, reveal_segments, static_segments};
