//! Conversion between colour-coded label images, per-class mask stacks and
//! class-index images.

use std::path::Path;
use std::time::{Duration, Instant};
use ndarray::{stack, Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};
use rayon::prelude::*;
use crate::common::{image_to_array, open_image, open_index_image, ColourMap, MaskStack};
use crate::error::Error;
use crate::{utils, Result};

#[derive(Debug, Clone)]
pub struct MaskCodec {
    colour_map: ColourMap,
    strict: bool,
}

impl MaskCodec {
    pub fn new(colour_map: ColourMap) -> Self {
        Self {
            colour_map,
            strict: false,
        }
    }

    /// When set, `create_masks` rejects label images containing colours
    /// that are not in the colour map instead of leaving those pixels out
    /// of every mask.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn colour_map(&self) -> &ColourMap {
        &self.colour_map
    }

    pub fn num_classes(&self) -> usize {
        self.colour_map.num_classes()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Splits an `(H, W, 3)` label image into `(classes, H, W)` binary masks,
    /// one plane per class in colour-map order.
    ///
    /// A pixel whose colour is not registered is 0 in every plane.
    pub fn create_masks(&self, image: ArrayView3<u8>) -> Result<MaskStack> {
        let start = Instant::now();

        if image.shape()[2] != 3 {
            return Err(Error::channels(3, image.shape()));
        }

        let planes: Vec<Array2<u8>> = self
            .colour_map
            .entries()
            .par_iter()
            .map(|class| {
                Zip::from(image.lanes(Axis(2))).map_collect(|pixel| class.matches(pixel.iter()) as u8)
            })
            .collect();

        let views: Vec<ArrayView2<u8>> = planes.iter().map(|p| p.view()).collect();
        let masks = stack(Axis(0), &views)?;
        let elapsed = utils::trace("TIME", "Create masks", start, Duration::ZERO);

        // Colours are distinct, so a pixel is set in at most one plane.
        let unmatched = masks.sum_axis(Axis(0)).iter().filter(|&&v| v == 0).count();
        if unmatched > 0 {
            if self.strict {
                return Err(Error::UnmatchedPixels { count: unmatched });
            }
            log::debug!("{} of {} pixels match no registered colour", unmatched, image.shape()[0] * image.shape()[1]);
        }
        utils::trace("TIME", "Unmatched check", start, elapsed);

        Ok(masks)
    }

    /// Loads the label image at `path` with its own channel count and
    /// delegates to `create_masks`.
    pub fn create_masks_from_path<P: AsRef<Path>>(&self, path: P) -> Result<MaskStack> {
        let image = open_image(path)?;
        let array = image_to_array(&image)?;
        self.create_masks(array.view())
    }

    /// Paints every class index with its registered colour. Indices outside
    /// `0..num_classes` are left black.
    pub fn decode_segmap<T>(&self, index_image: ArrayView2<T>) -> Array3<u8>
    where
        T: Copy + TryInto<usize> + Sync,
    {
        let start = Instant::now();
        let (height, width) = index_image.dim();
        let classes = self.colour_map.entries();

        let mut rgb = Array3::<u8>::zeros((height, width, 3));
        Zip::from(rgb.lanes_mut(Axis(2)))
            .and(&index_image)
            .par_for_each(|mut pixel, &index| {
                if let Some(class) = index.try_into().ok().and_then(|i: usize| classes.get(i)) {
                    for (dst, src) in pixel.iter_mut().zip(class.colour.iter()) {
                        *dst = *src;
                    }
                }
            });

        utils::trace("TIME", "Decode segmap", start, Duration::ZERO);
        rgb
    }

    /// Decodes a single-channel (8 or 16 bit) class-index image from disk.
    pub fn decode_segmap_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Array3<u8>> {
        let index_image = open_index_image(path)?;
        Ok(self.decode_segmap(index_image.view()))
    }
}

/// Argmax over the class axis of a mask stack. Ties resolve to the lowest
/// class, so a pixel with no set plane maps to class 0.
pub fn masks_to_class_index(masks: ArrayView3<u8>) -> Array2<usize> {
    masks.map_axis(Axis(0), |lane| {
        lane.iter()
            .enumerate()
            .fold((0, 0u8), |(best_i, best_v), (i, &v)| if v > best_v { (i, v) } else { (best_i, best_v) })
            .0
    })
}
