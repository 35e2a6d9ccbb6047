//! Options for building segmentation dataset loaders.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::common::{ColourMap, KnownDataset};
use crate::data::ClassColour;
use crate::error::Error;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSeg {
    pub input_path: String,
    pub label_path: String,

    // colour source, at least one of these must be set
    pub dataset: Option<String>,
    pub colour_map: Option<Vec<ClassColour>>,

    pub strict_colours: bool,
    pub shuffle: bool,
    pub seed: Option<u64>,
}

impl Default for ConfigSeg {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            label_path: String::new(),
            dataset: None,
            colour_map: None,
            strict_colours: false,
            shuffle: false,
            seed: None,
        }
    }
}

impl ConfigSeg {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads a JSON config, e.g.
    /// `{"input_path": "train", "label_path": "train_labels", "dataset": "camvid"}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_input_path(mut self, input_path: &str) -> Self {
        self.input_path = input_path.to_string();
        self
    }

    pub fn with_label_path(mut self, label_path: &str) -> Self {
        self.label_path = label_path.to_string();
        self
    }

    pub fn with_dataset(mut self, dataset: &str) -> Self {
        self.dataset = Some(dataset.to_string());
        self
    }

    pub fn with_known_dataset(mut self, dataset: KnownDataset) -> Self {
        self.dataset = Some(dataset.as_str_lowercase().to_string());
        self
    }

    pub fn with_colour_map(mut self, colour_map: &[(&str, [u8; 3])]) -> Self {
        self.colour_map = Some(colour_map.iter().map(|(label, colour)| ClassColour::new(label, *colour)).collect());
        self
    }

    /// Reads a JSON array of `{"label": ..., "colour": [r, g, b]}` entries.
    pub fn with_colour_map_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        self.colour_map = Some(serde_json::from_str(&text)?);
        Ok(self)
    }

    pub fn with_strict_colours(mut self, x: bool) -> Self {
        self.strict_colours = x;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool, seed: Option<u64>) -> Self {
        self.shuffle = shuffle;
        self.seed = seed;
        self
    }

    pub fn build_colour_map(&self) -> Result<ColourMap> {
        ColourMap::new(self.dataset.as_deref(), self.colour_map.clone())
    }

    pub fn summary(&self) -> String {
        format!("Input Path: {}\n\
        Label Path: {}\n\
        Dataset: {}\n\
        Custom Colour Map: {}\n\
        Strict Colours: {}\n\
        Shuffle: {} (seed {:?})",
                self.input_path, self.label_path,
                self.dataset.as_deref().unwrap_or("-"),
                self.colour_map.as_ref().map(|m| m.len()).unwrap_or(0),
                self.strict_colours, self.shuffle, self.seed)
    }
}
