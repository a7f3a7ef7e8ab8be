pub mod renderer;
pub mod resize;

pub use renderer::{RenderError, RenderVariants, VariantRenderer};
pub use resize::ImageResize;
