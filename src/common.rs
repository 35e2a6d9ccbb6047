mod colour_map;
mod known_dataset;
mod label_image;

pub use colour_map::*;
pub use known_dataset::*;
pub use label_image::*;
