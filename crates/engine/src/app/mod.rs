mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{text_size_px, DrawCommand, DrawList, Renderer};
pub(crate) use rendering::OverlayData;
pub use scene::{InputSnapshot, Scene, SceneCommand, Vec2, Viewport};
