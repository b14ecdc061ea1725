mod draw_list;
mod font;
mod overlay;
mod raster;
mod renderer;

pub use draw_list::{DrawCommand, DrawList};
pub use font::text_size_px;
pub(crate) use overlay::OverlayData;
pub use renderer::Renderer;
