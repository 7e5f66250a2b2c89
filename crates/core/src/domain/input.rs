//! Boundary validation for submitted recommendation requests.
//!
//! Form posts carry every value as text and JSON clients send numbers, so numeric
//! readings arrive as [`FieldValue`] and are only trusted after [`RecommendationInput::validate`]
//! has turned them into a [`RecommendationRequest`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::features::{Feature, FeatureVector, FEATURE_COUNT};

pub const SEASON_FIELD: &str = "Season";
pub const CITY_FIELD: &str = "City";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// Any other JSON value (`true`, arrays, objects). Always fails validation.
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn display(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Unvalidated request as posted by the form or the JSON API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationInput {
    #[serde(rename = "Nitrogen", alias = "nitrogen")]
    pub nitrogen: Option<FieldValue>,
    #[serde(rename = "Phosporus", alias = "phosphorus", alias = "Phosphorus")]
    pub phosphorus: Option<FieldValue>,
    #[serde(rename = "Potassium", alias = "potassium")]
    pub potassium: Option<FieldValue>,
    #[serde(rename = "Temperature", alias = "temperature")]
    pub temperature: Option<FieldValue>,
    #[serde(rename = "Humidity", alias = "humidity")]
    pub humidity: Option<FieldValue>,
    #[serde(rename = "Ph", alias = "ph")]
    pub ph: Option<FieldValue>,
    #[serde(rename = "Rainfall", alias = "rainfall")]
    pub rainfall: Option<FieldValue>,
    #[serde(rename = "Season", alias = "season")]
    pub season: Option<String>,
    #[serde(rename = "City", alias = "city")]
    pub city: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|error| error.field).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.message.clone()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: {}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validated request: finite readings plus trimmed season and city.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationRequest {
    pub features: FeatureVector,
    pub season: String,
    pub city: String,
}

impl RecommendationRequest {
    pub fn new(
        features: impl Into<FeatureVector>,
        season: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self { features: features.into(), season: season.into(), city: city.into() }
    }
}

impl RecommendationInput {
    pub fn reading(&self, feature: Feature) -> Option<&FieldValue> {
        match feature {
            Feature::Nitrogen => self.nitrogen.as_ref(),
            Feature::Phosphorus => self.phosphorus.as_ref(),
            Feature::Potassium => self.potassium.as_ref(),
            Feature::Temperature => self.temperature.as_ref(),
            Feature::Humidity => self.humidity.as_ref(),
            Feature::Ph => self.ph.as_ref(),
            Feature::Rainfall => self.rainfall.as_ref(),
        }
    }

    pub fn set_reading(&mut self, feature: Feature, value: impl Into<FieldValue>) {
        let slot = match feature {
            Feature::Nitrogen => &mut self.nitrogen,
            Feature::Phosphorus => &mut self.phosphorus,
            Feature::Potassium => &mut self.potassium,
            Feature::Temperature => &mut self.temperature,
            Feature::Humidity => &mut self.humidity,
            Feature::Ph => &mut self.ph,
            Feature::Rainfall => &mut self.rainfall,
        };
        *slot = Some(value.into());
    }

    /// Submitted values keyed by form field name, for re-rendering the form.
    pub fn form_values(&self) -> BTreeMap<&'static str, String> {
        let mut values = BTreeMap::new();
        for feature in Feature::ALL {
            let shown = self.reading(feature).map(FieldValue::display).unwrap_or_default();
            values.insert(feature.form_field(), shown);
        }
        values.insert(SEASON_FIELD, self.season.clone().unwrap_or_default());
        values.insert(CITY_FIELD, self.city.clone().unwrap_or_default());
        values
    }

    /// Collects every offending field rather than stopping at the first one.
    pub fn validate(&self) -> Result<RecommendationRequest, ValidationErrors> {
        let mut errors = Vec::new();
        let mut readings = [0.0_f64; FEATURE_COUNT];

        for feature in Feature::ALL {
            match parse_reading(feature, self.reading(feature)) {
                Ok(value) => readings[feature.index()] = value,
                Err(error) => errors.push(error),
            }
        }

        let season = required_text(SEASON_FIELD, self.season.as_deref());
        let city = required_text(CITY_FIELD, self.city.as_deref());

        match (season, city) {
            (Ok(season), Ok(city)) if errors.is_empty() => {
                Ok(RecommendationRequest::new(readings, season, city))
            }
            (season, city) => {
                errors.extend(season.err());
                errors.extend(city.err());
                Err(ValidationErrors { errors })
            }
        }
    }
}

fn parse_reading(feature: Feature, value: Option<&FieldValue>) -> Result<f64, FieldError> {
    let field = feature.form_field();
    let label = feature.label();

    let parsed = match value {
        None => return Err(FieldError { field, message: format!("{label} is required") }),
        Some(FieldValue::Number(number)) => *number,
        Some(FieldValue::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(FieldError { field, message: format!("{label} is required") });
            }
            text.parse::<f64>()
                .map_err(|_| FieldError { field, message: format!("{label} must be a number") })?
        }
        Some(FieldValue::Other(_)) => {
            return Err(FieldError { field, message: format!("{label} must be a number") })
        }
    };

    if !parsed.is_finite() {
        return Err(FieldError { field, message: format!("{label} must be a finite number") });
    }

    Ok(parsed)
}

fn required_text(field: &'static str, value: Option<&str>) -> Result<String, FieldError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(FieldError { field, message: format!("{field} is required") }),
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, RecommendationInput};
    use crate::domain::features::Feature;

    fn complete_input() -> RecommendationInput {
        let mut input = RecommendationInput {
            season: Some(" Rainy ".to_string()),
            city: Some("Guntur".to_string()),
            ..RecommendationInput::default()
        };
        for (feature, value) in Feature::ALL.into_iter().zip(["90", "42", "43", "20.8", "82", "6.5", "202.9"]) {
            input.set_reading(feature, value);
        }
        input
    }

    #[test]
    fn complete_input_validates_in_column_order() {
        let request = complete_input().validate().expect("input should validate");

        assert_eq!(request.features.values(), &[90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]);
        assert_eq!(request.season, "Rainy");
        assert_eq!(request.city, "Guntur");
    }

    #[test]
    fn every_problem_is_reported() {
        let mut input = complete_input();
        input.nitrogen = None;
        input.ph = Some(FieldValue::Text("acidic".to_string()));
        input.rainfall = Some(FieldValue::Text("   ".to_string()));
        input.city = Some(String::new());

        let errors = input.validate().expect_err("input should be rejected");

        assert_eq!(errors.fields(), vec!["Nitrogen", "Ph", "Rainfall", "City"]);
        assert_eq!(errors.errors[0].message, "Nitrogen is required");
        assert_eq!(errors.errors[1].message, "pH must be a number");
        assert_eq!(errors.errors[2].message, "Rainfall is required");
        assert!(errors.to_string().starts_with("invalid input: Nitrogen is required"));
    }

    #[test]
    fn non_finite_text_is_rejected() {
        let mut input = complete_input();
        input.set_reading(Feature::Temperature, "NaN");
        input.set_reading(Feature::Humidity, "inf");

        let errors = input.validate().expect_err("non-finite readings should be rejected");
        assert_eq!(errors.fields(), vec!["Temperature", "Humidity"]);
        assert!(errors.errors[0].message.contains("finite"));
    }

    #[test]
    fn json_numbers_and_lowercase_names_are_accepted() {
        let input: RecommendationInput = serde_json::from_str(
            r#"{"nitrogen": 90, "phosphorus": 42, "potassium": 43, "temperature": 20.8,
                "humidity": 82, "ph": "6.5", "rainfall": 202.9, "season": "rainy", "city": "guntur"}"#,
        )
        .expect("json should deserialize");

        let request = input.validate().expect("input should validate");
        assert_eq!(request.features.get(Feature::Ph), 6.5);
        assert_eq!(request.features.get(Feature::Nitrogen), 90.0);
    }

    #[test]
    fn json_values_that_are_not_numbers_fail_validation() {
        let input: RecommendationInput = serde_json::from_str(
            r#"{"nitrogen": true, "phosphorus": [42], "potassium": 43, "temperature": 20.8,
                "humidity": {"value": 82}, "ph": 6.5, "rainfall": 202.9, "season": "rainy", "city": "guntur"}"#,
        )
        .expect("any json scalar or structure should deserialize");

        let errors = input.validate().expect_err("non-numeric readings should be rejected");
        assert_eq!(errors.fields(), vec!["Nitrogen", "Phosporus", "Humidity"]);
        assert_eq!(errors.errors[0].message, "Nitrogen must be a number");
        assert_eq!(input.form_values()["Nitrogen"], "true");
    }

    #[test]
    fn form_values_echo_submitted_text() {
        let mut input = complete_input();
        input.set_reading(Feature::Potassium, "abc");

        let values = input.form_values();
        assert_eq!(values["Potassium"], "abc");
        assert_eq!(values["Phosporus"], "42");
        assert_eq!(values["Season"], " Rainy ");
    }
}
