mod utils;
pub mod common;
pub mod data;
pub mod dataset_loader;
pub mod error;
pub mod mask_codec;

use crate::data::ConfigSeg;
use crate::dataset_loader::SegmentationDatasetLoader;

pub use crate::error::Error;
pub use crate::mask_codec::{masks_to_class_index, MaskCodec};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub fn init_loader(config: &ConfigSeg) -> Result<SegmentationDatasetLoader> {
    log::info!("Initializing segmentation loader\n{}", config.summary());
    SegmentationDatasetLoader::new(config)
}
