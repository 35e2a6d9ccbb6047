mod class_colour;
mod config_seg;

pub use class_colour::ClassColour;
pub use config_seg::ConfigSeg;
