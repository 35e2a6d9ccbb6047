use std::collections::HashSet;
use image::Rgb;
use crate::common::KnownDataset;
use crate::data::ClassColour;
use crate::error::Error;
use crate::Result;

/// Ordered class name -> colour table. Index `i` of `classes()` and
/// `colours()` always refers to the same class, which is what the decoder
/// relies on when turning a class index back into a colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourMap {
    entries: Vec<ClassColour>,
    dataset: Option<KnownDataset>,
}

impl ColourMap {
    /// Resolves a colour map from a dataset identifier and/or an explicit map.
    ///
    /// A recognised dataset identifier takes precedence over the explicit map.
    /// An unrecognised identifier falls back to the explicit map.
    pub fn new(dataset: Option<&str>, colour_map: Option<Vec<ClassColour>>) -> Result<Self> {
        if let Some(known) = dataset.and_then(KnownDataset::from_str) {
            return Ok(Self::from_dataset(known));
        }

        match (dataset, colour_map) {
            (_, Some(map)) => {
                if let Some(name) = dataset {
                    log::warn!("Unknown dataset '{}', using the supplied colour map", name);
                }
                Self::from_pairs(map)
            }
            (Some(name), None) => Err(Error::config(format!(
                "unknown dataset '{}' and no colour map supplied",
                name
            ))),
            (None, None) => Err(Error::config("both 'dataset' and 'colour_map' can't be None")),
        }
    }

    pub fn from_dataset(dataset: KnownDataset) -> Self {
        let entries = dataset
            .classes()
            .iter()
            .map(|(label, colour)| ClassColour::new(label, *colour))
            .collect();

        Self {
            entries,
            dataset: Some(dataset),
        }
    }

    pub fn from_pairs<I, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<ClassColour>,
    {
        let entries: Vec<ClassColour> = pairs.into_iter().map(Into::into).collect();

        if entries.is_empty() {
            return Err(Error::config("colour map has no classes"));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.colour) {
                return Err(Error::config(format!(
                    "colour {:?} of class '{}' is already registered",
                    entry.colour, entry.label
                )));
            }
        }

        Ok(Self {
            entries,
            dataset: None,
        })
    }

    pub fn dataset(&self) -> Option<KnownDataset> {
        self.dataset
    }

    pub fn num_classes(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ClassColour] {
        &self.entries
    }

    pub fn classes(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn colours(&self) -> Vec<Rgb<u8>> {
        self.entries.iter().map(ClassColour::rgb).collect()
    }

    pub fn colour_of(&self, index: usize) -> Option<Rgb<u8>> {
        self.entries.get(index).map(ClassColour::rgb)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.label == label)
    }
}
