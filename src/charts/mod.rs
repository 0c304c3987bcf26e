//! Charts module - state accident maps

mod basemap;
mod plotter;
mod renderer;

pub use basemap::BaseMap;
pub use plotter::{MapBounds, StateMap};
pub use renderer::StaticMapRenderer;
