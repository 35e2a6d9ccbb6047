//! Paired input / label directories and the segmentation loader built on them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use image::{DynamicImage, Rgb, RgbImage};
use ndarray::{Array3, ArrayView2, ArrayView3};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use crate::common::{open_image, ColourMap, MaskStack};
use crate::data::ConfigSeg;
use crate::error::Error;
use crate::mask_codec::MaskCodec;
use crate::{utils, Result};

/// Suffix label files may carry after the input's stem, as in CamVid
/// (`0001TP_006690.png` -> `0001TP_006690_L.png`).
pub const LABEL_SUFFIX: &str = "_L";

/// Input images paired with their label images by file stem, in input
/// file name order.
#[derive(Debug, Clone)]
pub struct ImageDatasetLoader {
    input_path: PathBuf,
    label_path: PathBuf,
    pairs: Vec<(PathBuf, PathBuf)>,
}

impl ImageDatasetLoader {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input_path: P, label_path: Q) -> Result<Self> {
        let mut loader = Self {
            input_path: input_path.as_ref().to_path_buf(),
            label_path: label_path.as_ref().to_path_buf(),
            pairs: Vec::new(),
        };
        loader.scan()?;
        Ok(loader)
    }

    /// Verifies both directories exist and hold the same number of images.
    pub fn check(&self) -> Result<()> {
        for dir in [&self.input_path, &self.label_path] {
            if !dir.is_dir() {
                return Err(Error::NotFound(dir.clone()));
            }
        }

        let inputs = utils::list_image_files(&self.input_path)?.len();
        let labels = utils::list_image_files(&self.label_path)?.len();
        if inputs != labels {
            return Err(Error::config(format!(
                "{} input images in {} but {} label images in {}",
                inputs, self.input_path.display(), labels, self.label_path.display()
            )));
        }
        Ok(())
    }

    fn scan(&mut self) -> Result<()> {
        self.check()?;
        let inputs = utils::list_image_files(&self.input_path)?;
        let labels = utils::list_image_files(&self.label_path)?;
        self.pairs = pair_by_stem(inputs, labels)?;
        log::debug!("Found {} image pairs under {}", self.pairs.len(), self.input_path.display());
        Ok(())
    }

    /// Reorders the pairs. The same seed always gives the same order.
    pub fn shuffle(&mut self, seed: Option<u64>) {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.pairs.shuffle(&mut rng);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(PathBuf, PathBuf)] {
        &self.pairs
    }

    fn pair(&self, index: usize) -> Result<&(PathBuf, PathBuf)> {
        self.pairs.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.pairs.len(),
        })
    }

    pub fn input_path(&self, index: usize) -> Result<&Path> {
        Ok(self.pair(index)?.0.as_path())
    }

    pub fn label_path(&self, index: usize) -> Result<&Path> {
        Ok(self.pair(index)?.1.as_path())
    }

    pub fn load_input(&self, index: usize) -> Result<DynamicImage> {
        open_image(self.input_path(index)?)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// A label belongs to an input when its stem is the input stem, or the input
/// stem followed by `LABEL_SUFFIX`. The exact stem is preferred.
fn pair_by_stem(inputs: Vec<PathBuf>, labels: Vec<PathBuf>) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut by_stem: HashMap<String, PathBuf> = labels.into_iter().map(|l| (file_stem(&l), l)).collect();

    inputs
        .into_iter()
        .map(|input| {
            let stem = file_stem(&input);
            let label = by_stem
                .remove(&stem)
                .or_else(|| by_stem.remove(&format!("{}{}", stem, LABEL_SUFFIX)))
                .ok_or_else(|| Error::config(format!("no label image found for {}", input.display())))?;
            Ok((input, label))
        })
        .collect()
}

/// One training sample: the input image and the masks of its label image.
#[derive(Debug, Clone)]
pub struct SegmentationSample {
    pub image: RgbImage,
    pub masks: MaskStack,
    pub input_path: PathBuf,
    pub label_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SegmentationDatasetLoader {
    images: ImageDatasetLoader,
    codec: MaskCodec,
    dataset: Option<String>,
}

impl SegmentationDatasetLoader {
    /// Fails with a configuration error before touching the filesystem when
    /// the config has neither a known dataset nor a colour map.
    pub fn new(config: &ConfigSeg) -> Result<Self> {
        let colour_map = config.build_colour_map()?;
        let codec = MaskCodec::new(colour_map).with_strict(config.strict_colours);

        let mut images = ImageDatasetLoader::new(&config.input_path, &config.label_path)?;
        if config.shuffle {
            images.shuffle(config.seed);
        }

        log::info!("Segmentation loader ready: {} samples, {} classes", images.len(), codec.num_classes());

        Ok(Self {
            images,
            codec,
            dataset: config.dataset.clone(),
        })
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    pub fn images(&self) -> &ImageDatasetLoader {
        &self.images
    }

    pub fn codec(&self) -> &MaskCodec {
        &self.codec
    }

    pub fn colour_map(&self) -> &ColourMap {
        self.codec.colour_map()
    }

    pub fn classes(&self) -> Vec<&str> {
        self.colour_map().classes()
    }

    pub fn colours(&self) -> Vec<Rgb<u8>> {
        self.colour_map().colours()
    }

    pub fn num_classes(&self) -> usize {
        self.codec.num_classes()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn create_masks(&self, image: ArrayView3<u8>) -> Result<MaskStack> {
        self.codec.create_masks(image)
    }

    pub fn create_masks_from_path<P: AsRef<Path>>(&self, path: P) -> Result<MaskStack> {
        self.codec.create_masks_from_path(path)
    }

    pub fn decode_segmap<T>(&self, index_image: ArrayView2<T>) -> Array3<u8>
    where
        T: Copy + TryInto<usize> + Sync,
    {
        self.codec.decode_segmap(index_image)
    }

    pub fn decode_segmap_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Array3<u8>> {
        self.codec.decode_segmap_from_path(path)
    }

    pub fn get(&self, index: usize) -> Result<SegmentationSample> {
        let input_path = self.images.input_path(index)?.to_path_buf();
        let label_path = self.images.label_path(index)?.to_path_buf();

        let image = open_image(&input_path)?.to_rgb8();
        let masks = self.codec.create_masks_from_path(&label_path)?;

        let (width, height) = image.dimensions();
        if masks.shape()[1..] != [height as usize, width as usize] {
            return Err(Error::Shape {
                expected: format!("label of {}x{} like {}", width, height, input_path.display()),
                actual: format!("masks {:?} from {}", masks.shape(), label_path.display()),
            });
        }

        Ok(SegmentationSample {
            image,
            masks,
            input_path,
            label_path,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<SegmentationSample>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}
