use serde::{Deserialize, Serialize};

use crate::domain::features::{FeatureVector, FEATURE_COUNT};
use crate::model::{ensure_finite, ModelError, Transformer};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxParams {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: [f64; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

fn default_feature_range() -> [f64; 2] {
    [0.0, 1.0]
}

/// Rescales each column from its fitted `[data_min, data_max]` into `feature_range`.
#[derive(Clone, Debug, PartialEq)]
pub struct MinMaxScaler {
    scale: [f64; FEATURE_COUNT],
    offset: [f64; FEATURE_COUNT],
}

impl MinMaxScaler {
    pub fn from_params(params: &MinMaxParams) -> Result<Self, ModelError> {
        let data_min = fitted_column("min_max.data_min", &params.data_min)?;
        let data_max = fitted_column("min_max.data_max", &params.data_max)?;
        let [low, high] = params.feature_range;
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(ModelError::InvalidBundle(format!(
                "min_max.feature_range must be finite and increasing, got [{low}, {high}]"
            )));
        }

        let mut scale = [0.0; FEATURE_COUNT];
        let mut offset = [0.0; FEATURE_COUNT];
        for column in 0..FEATURE_COUNT {
            if data_min[column] > data_max[column] {
                return Err(ModelError::InvalidBundle(format!(
                    "min_max column {column} has data_min greater than data_max"
                )));
            }
            // constant columns keep a unit range instead of dividing by zero
            let range = non_zero(data_max[column] - data_min[column]);
            scale[column] = (high - low) / range;
            offset[column] = low - data_min[column] * scale[column];
        }

        Ok(Self { scale, offset })
    }
}

impl Transformer for MinMaxScaler {
    fn name(&self) -> &'static str {
        "min_max_scaler"
    }

    fn transform(&self, input: &FeatureVector) -> Result<FeatureVector, ModelError> {
        let output = input.map(|column, value| value * self.scale[column] + self.offset[column]);
        ensure_finite(output, self.name())
    }
}

/// Centres each column on its fitted mean and divides by its fitted scale.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn from_params(params: &StandardParams) -> Result<Self, ModelError> {
        let mean = fitted_column("standard.mean", &params.mean)?;
        let mut scale = fitted_column("standard.scale", &params.scale)?;
        if let Some(column) = scale.iter().position(|value| *value < 0.0) {
            return Err(ModelError::InvalidBundle(format!(
                "standard.scale column {column} is negative"
            )));
        }
        for value in &mut scale {
            *value = non_zero(*value);
        }

        Ok(Self { mean, scale })
    }
}

impl Transformer for StandardScaler {
    fn name(&self) -> &'static str {
        "standard_scaler"
    }

    fn transform(&self, input: &FeatureVector) -> Result<FeatureVector, ModelError> {
        let output = input.map(|column, value| (value - self.mean[column]) / self.scale[column]);
        ensure_finite(output, self.name())
    }
}

fn non_zero(value: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        value
    }
}

fn fitted_column(name: &str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], ModelError> {
    let column = <[f64; FEATURE_COUNT]>::try_from(values).map_err(|_| {
        ModelError::InvalidBundle(format!(
            "{name} must have {FEATURE_COUNT} entries, got {}",
            values.len()
        ))
    })?;
    if column.iter().any(|value| !value.is_finite()) {
        return Err(ModelError::InvalidBundle(format!("{name} contains a non-finite entry")));
    }
    Ok(column)
}
