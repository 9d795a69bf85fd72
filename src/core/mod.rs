pub mod api_client;
pub mod break_slot;
pub mod comparison;
pub mod export;
pub mod grid;
pub mod html_renderer;
pub mod palette;
pub mod raster;
pub mod viewer;
