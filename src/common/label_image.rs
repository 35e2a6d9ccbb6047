use std::path::Path;
use image::{DynamicImage, GrayImage, RgbImage};
use ndarray::{Array2, Array3, ArrayView3};
use crate::error::Error;
use crate::Result;

/// Colour-coded label image, `(height, width, channels)`.
pub type LabelArray = Array3<u8>;

/// Per-class binary masks, `(classes, height, width)` with values in {0, 1}.
pub type MaskStack = Array3<u8>;

/// Opens an image, failing with `NotFound` before touching the decoder
/// when the path is missing.
pub fn open_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Converts to an `(height, width, channels)` byte array, keeping the
/// image's own channel count. Wider sample types are narrowed to 8 bits.
pub fn image_to_array(image: &DynamicImage) -> Result<LabelArray> {
    let (width, height) = (image.width() as usize, image.height() as usize);

    let (channels, raw) = match image {
        DynamicImage::ImageLuma8(img) => (1, img.as_raw().clone()),
        DynamicImage::ImageLumaA8(img) => (2, img.as_raw().clone()),
        DynamicImage::ImageRgb8(img) => (3, img.as_raw().clone()),
        DynamicImage::ImageRgba8(img) => (4, img.as_raw().clone()),
        other => match (other.color().channel_count(), other.color().has_alpha()) {
            (1, _) => (1, other.to_luma8().into_raw()),
            (2, _) => (2, other.to_luma_alpha8().into_raw()),
            (_, true) => (4, other.to_rgba8().into_raw()),
            _ => (3, other.to_rgb8().into_raw()),
        },
    };

    Ok(Array3::from_shape_vec((height, width, channels), raw)?)
}

pub fn rgb_to_array(image: &RgbImage) -> Result<LabelArray> {
    let (width, height) = image.dimensions();
    Ok(Array3::from_shape_vec(
        (height as usize, width as usize, 3),
        image.as_raw().clone(),
    )?)
}

/// Packs an `(height, width, 3)` array back into an `RgbImage`.
pub fn array_to_rgb(array: ArrayView3<u8>) -> Result<RgbImage> {
    let (height, width, channels) = array.dim();
    if channels != 3 {
        return Err(Error::channels(3, array.shape()));
    }

    let raw: Vec<u8> = array.iter().copied().collect();
    RgbImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| Error::Shape {
        expected: format!("{}x{}x3 buffer", width, height),
        actual: format!("shape {:?}", array.shape()),
    })
}

/// Reads a single-channel class-index image. 16-bit greyscale keeps its
/// full range, so up to 65536 classes survive the round trip through disk.
pub fn open_index_image<P: AsRef<Path>>(path: P) -> Result<Array2<u16>> {
    let image = open_image(path)?;
    let (width, height) = (image.width() as usize, image.height() as usize);

    let raw: Vec<u16> = match &image {
        DynamicImage::ImageLuma8(img) => img.as_raw().iter().map(|&v| v as u16).collect(),
        DynamicImage::ImageLuma16(img) => img.as_raw().clone(),
        other => {
            let channels = other.color().channel_count() as usize;
            return Err(Error::channels(1, &[height, width, channels]));
        }
    };

    Ok(Array2::from_shape_vec((height, width), raw)?)
}

pub fn index_to_gray(index: &Array2<u8>) -> Result<GrayImage> {
    let (height, width) = index.dim();
    let raw: Vec<u8> = index.iter().copied().collect();
    GrayImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| Error::Shape {
        expected: format!("{}x{} buffer", width, height),
        actual: format!("shape {:?}", index.shape()),
    })
}
