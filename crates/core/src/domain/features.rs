use serde::{Deserialize, Serialize};

/// Number of soil/climate readings the model pipeline expects.
pub const FEATURE_COUNT: usize = 7;

/// One soil/climate reading, in the column order the fitted scalers were trained on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Rainfall,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of the HTML form field carrying this reading. `Phosporus` is the
    /// spelling existing form clients post, so it stays.
    pub fn form_field(self) -> &'static str {
        match self {
            Self::Nitrogen => "Nitrogen",
            Self::Phosphorus => "Phosporus",
            Self::Potassium => "Potassium",
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Ph => "Ph",
            Self::Rainfall => "Rainfall",
        }
    }

    /// Column name the training job writes into the bundle's `feature_names`.
    pub fn bundle_name(self) -> &'static str {
        match self {
            Self::Nitrogen => "N",
            Self::Phosphorus => "P",
            Self::Potassium => "K",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Ph => "ph",
            Self::Rainfall => "rainfall",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Nitrogen => "Nitrogen",
            Self::Phosphorus => "Phosphorus",
            Self::Potassium => "Potassium",
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Ph => "pH",
            Self::Rainfall => "Rainfall",
        }
    }
}

/// Ordered 7-tuple of readings fed to the normalizer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// Applies `f(column, value)` to every component.
    pub fn map(&self, f: impl Fn(usize, f64) -> f64) -> Self {
        let mut out = self.0;
        for (column, value) in out.iter_mut().enumerate() {
            *value = f(column, *value);
        }
        Self(out)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|value| value.is_finite())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}
