use image::Rgb;
use serde::{Deserialize, Serialize};

/// One entry of a colour map, as stored in JSON loader configs.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassColour {
    pub label: String,
    pub colour: [u8; 3],
}

impl ClassColour {
    pub fn new(label: &str, colour: [u8; 3]) -> Self {
        Self {
            label: label.to_string(),
            colour,
        }
    }

    pub fn rgb(&self) -> Rgb<u8> {
        Rgb(self.colour)
    }

    /// True when the pixel's channels equal this colour exactly.
    pub fn matches<'a, I>(&self, pixel: I) -> bool
    where
        I: IntoIterator<Item = &'a u8>,
    {
        pixel.into_iter().eq(self.colour.iter())
    }
}

impl<S: Into<String>> From<(S, [u8; 3])> for ClassColour {
    fn from((label, colour): (S, [u8; 3])) -> Self {
        Self {
            label: label.into(),
            colour,
        }
    }
}
