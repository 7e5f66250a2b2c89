use serde::{Deserialize, Serialize};

/// Crop names indexed by `label - 1`.
pub const CROP_NAMES: [&str; 22] = [
    "Rice",
    "Maize",
    "Jute",
    "Cotton",
    "Coconut",
    "Papaya",
    "Orange",
    "Apple",
    "Muskmelon",
    "Watermelon",
    "Grapes",
    "Mango",
    "Banana",
    "Pomegranate",
    "Lentil",
    "Blackgram",
    "Mungbean",
    "Mothbeans",
    "Pigeonpeas",
    "Kidneybeans",
    "Chickpea",
    "Coffee",
];

/// Raw class label emitted by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropLabel(pub i64);

impl CropLabel {
    /// Crop name for labels 1..=22, `None` for anything else.
    pub fn crop_name(self) -> Option<&'static str> {
        usize::try_from(self.0)
            .ok()
            .and_then(|label| label.checked_sub(1))
            .and_then(|index| CROP_NAMES.get(index))
            .copied()
    }
}
