//! Recommendation pipeline: normalize → classify → compose with advisor output.

use std::sync::Arc;

use serde::Serialize;

use crate::advisor::SeasonCityAdvisor;
use crate::domain::crop::CropLabel;
use crate::domain::features::FeatureVector;
use crate::domain::input::{RecommendationInput, RecommendationRequest};
use crate::errors::ApplicationError;
use crate::model::{ModelBundle, ModelError, Predictor, Transformer};

pub const INDETERMINATE_SENTENCE: &str =
    "Sorry, we could not determine the best crop to be cultivated with the provided data";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Recommended { label: CropLabel, crop: &'static str },
    /// The classifier returned a label outside the crop table.
    Indeterminate { label: CropLabel },
}

impl Classification {
    pub fn from_label(label: CropLabel) -> Self {
        match label.crop_name() {
            Some(crop) => Self::Recommended { label, crop },
            None => Self::Indeterminate { label },
        }
    }

    pub fn label(&self) -> CropLabel {
        match self {
            Self::Recommended { label, .. } | Self::Indeterminate { label } => *label,
        }
    }

    pub fn crop(&self) -> Option<&'static str> {
        match self {
            Self::Recommended { crop, .. } => Some(crop),
            Self::Indeterminate { .. } => None,
        }
    }

    pub fn sentence(&self) -> String {
        match self {
            Self::Recommended { crop, .. } => {
                format!("{crop} is the best crop to be cultivated right there")
            }
            Self::Indeterminate { .. } => INDETERMINATE_SENTENCE.to_string(),
        }
    }
}

/// `"<sentence>. Suggested crops for <season> season in <city> city: <a, b, c>."`
pub fn compose_message(
    classification: &Classification,
    season: &str,
    city: &str,
    suggestions: &[&str],
) -> String {
    format!(
        "{}. Suggested crops for {} season in {} city: {}.",
        classification.sentence(),
        season.to_lowercase(),
        city.to_lowercase(),
        suggestions.join(", ")
    )
}

/// Chained fitted transforms followed by the fitted classifier.
pub struct CropClassifier {
    version: String,
    transformers: Vec<Box<dyn Transformer>>,
    predictor: Box<dyn Predictor>,
}

impl std::fmt::Debug for CropClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropClassifier")
            .field("version", &self.version)
            .field(
                "transformers",
                &self.transformers.iter().map(|stage| stage.name()).collect::<Vec<_>>(),
            )
            .field("predictor", &self.predictor.kind())
            .finish()
    }
}

impl CropClassifier {
    pub fn new(
        version: impl Into<String>,
        transformers: Vec<Box<dyn Transformer>>,
        predictor: Box<dyn Predictor>,
    ) -> Self {
        Self { version: version.into(), transformers, predictor }
    }

    /// Min-max scaling, then standardization, then the classifier.
    pub fn from_bundle(bundle: ModelBundle) -> Self {
        Self::new(
            bundle.version,
            vec![Box::new(bundle.min_max), Box::new(bundle.standard)],
            Box::new(bundle.classifier),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn predictor_kind(&self) -> &'static str {
        self.predictor.kind()
    }

    pub fn stages(&self) -> Vec<&'static str> {
        self.transformers.iter().map(|stage| stage.name()).collect()
    }

    pub fn normalize(&self, features: &FeatureVector) -> Result<FeatureVector, ModelError> {
        self.transformers
            .iter()
            .try_fold(*features, |current, stage| stage.transform(&current))
    }

    pub fn classify(&self, features: &FeatureVector) -> Result<Classification, ModelError> {
        let normalized = self.normalize(features)?;
        let label = self.predictor.predict(&normalized)?;
        Ok(Classification::from_label(label))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub label: i64,
    pub crop: Option<String>,
    pub sentence: String,
    pub message: String,
    pub suggestions: Vec<String>,
    pub season: String,
    pub city: String,
    pub model_version: String,
}

/// Shared, read-only service handed to request handlers.
#[derive(Clone, Debug)]
pub struct RecommendationService {
    classifier: Arc<CropClassifier>,
    advisor: Arc<SeasonCityAdvisor>,
}

impl RecommendationService {
    pub fn new(classifier: Arc<CropClassifier>, advisor: Arc<SeasonCityAdvisor>) -> Self {
        Self { classifier, advisor }
    }

    pub fn classifier(&self) -> &CropClassifier {
        &self.classifier
    }

    pub fn advisor(&self) -> &SeasonCityAdvisor {
        &self.advisor
    }

    pub fn recommend(&self, input: &RecommendationInput) -> Result<Recommendation, ApplicationError> {
        let request = input.validate()?;
        self.recommend_request(&request)
    }

    pub fn recommend_request(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Recommendation, ApplicationError> {
        let classification = self.classifier.classify(&request.features)?;
        let suggestions = self.advisor.suggest(&request.season, &request.city);
        let message = compose_message(&classification, &request.season, &request.city, suggestions);

        Ok(Recommendation {
            label: classification.label().0,
            crop: classification.crop().map(str::to_string),
            sentence: classification.sentence(),
            message,
            suggestions: suggestions.iter().map(|crop| crop.to_string()).collect(),
            season: request.season.to_lowercase(),
            city: request.city.to_lowercase(),
            model_version: self.classifier.version().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{
        compose_message, Classification, CropClassifier, RecommendationService,
        INDETERMINATE_SENTENCE,
    };
    use crate::advisor::{SeasonCityAdvisor, NO_SEASON_SUGGESTIONS};
    use crate::domain::crop::CropLabel;
    use crate::domain::features::{Feature, FeatureVector};
    use crate::domain::input::RecommendationInput;
    use crate::errors::ApplicationError;
    use crate::model::{ModelError, Predictor, Transformer};

    struct FixedLabel(i64);

    impl Predictor for FixedLabel {
        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn predict(&self, _input: &FeatureVector) -> Result<CropLabel, ModelError> {
            Ok(CropLabel(self.0))
        }
    }

    /// Predicts label 1 when the first component is positive, else 22.
    struct SignOfNitrogen;

    impl Predictor for SignOfNitrogen {
        fn kind(&self) -> &'static str {
            "sign"
        }

        fn predict(&self, input: &FeatureVector) -> Result<CropLabel, ModelError> {
            Ok(CropLabel(if input.get(Feature::Nitrogen) > 0.0 { 1 } else { 22 }))
        }
    }

    struct Shift(f64);

    impl Transformer for Shift {
        fn name(&self) -> &'static str {
            "shift"
        }

        fn transform(&self, input: &FeatureVector) -> Result<FeatureVector, ModelError> {
            Ok(input.map(|_, value| value + self.0))
        }
    }

    fn service(predictor: Box<dyn Predictor>) -> RecommendationService {
        let classifier = CropClassifier::new("test", vec![Box::new(Shift(-50.0))], predictor);
        RecommendationService::new(Arc::new(classifier), Arc::new(SeasonCityAdvisor::builtin()))
    }

    fn input(nitrogen: &str, season: &str, city: &str) -> RecommendationInput {
        let mut input = RecommendationInput {
            season: Some(season.to_string()),
            city: Some(city.to_string()),
            ..RecommendationInput::default()
        };
        for feature in Feature::ALL {
            input.set_reading(feature, "10");
        }
        input.set_reading(Feature::Nitrogen, nitrogen);
        input
    }

    #[test]
    fn labels_resolve_to_crop_or_apology() {
        assert_eq!(Classification::from_label(CropLabel(1)).crop(), Some("Rice"));
        assert_eq!(Classification::from_label(CropLabel(22)).crop(), Some("Coffee"));

        let unknown = Classification::from_label(CropLabel(23));
        assert_eq!(unknown, Classification::Indeterminate { label: CropLabel(23) });
        assert_eq!(unknown.sentence(), INDETERMINATE_SENTENCE);
        assert_eq!(Classification::from_label(CropLabel(0)).crop(), None);
    }

    #[test]
    fn message_joins_suggestions_and_lowercases_location() {
        let message = compose_message(
            &Classification::from_label(CropLabel(4)),
            "Rainy",
            "GUNTUR",
            &["Rice", "Pulses", "Chillies"],
        );
        assert_eq!(
            message,
            "Cotton is the best crop to be cultivated right there. \
             Suggested crops for rainy season in guntur city: Rice, Pulses, Chillies."
        );
    }

    #[test]
    fn indeterminate_message_keeps_suggestions() {
        let message = compose_message(
            &Classification::Indeterminate { label: CropLabel(99) },
            "monsoon",
            "delhi",
            &[NO_SEASON_SUGGESTIONS],
        );
        assert!(message.starts_with(INDETERMINATE_SENTENCE));
        assert!(message.ends_with(
            "Suggested crops for monsoon season in delhi city: No specific suggestions for the given season."
        ));
    }

    #[test]
    fn transforms_run_before_prediction() {
        let service = service(Box::new(SignOfNitrogen));

        let high = service.recommend(&input("60", "summer", "delhi")).expect("recommendation");
        let low = service.recommend(&input("40", "summer", "delhi")).expect("recommendation");

        assert_eq!(high.crop.as_deref(), Some("Rice"));
        assert_eq!(low.crop.as_deref(), Some("Coffee"));
        assert_eq!(low.suggestions, vec!["Cotton", "Watermelon", "Maize"]);
    }

    #[test]
    fn rainy_guntur_end_to_end() {
        let service = service(Box::new(FixedLabel(1)));

        let recommendation =
            service.recommend(&input("90", "rainy", "guntur")).expect("recommendation");

        assert_eq!(recommendation.label, 1);
        assert!(recommendation.message.contains("Rice is the best crop to be cultivated right there"));
        assert!(recommendation
            .message
            .contains("Suggested crops for rainy season in guntur city: Rice, Pulses, Chillies."));
        assert_eq!(recommendation.model_version, "test");
    }

    #[test]
    fn unknown_label_yields_apology_not_error() {
        let service = service(Box::new(FixedLabel(40)));

        let recommendation =
            service.recommend(&input("90", "Summer", "Kerala")).expect("recommendation");

        assert_eq!(recommendation.crop, None);
        assert_eq!(
            recommendation.message,
            format!(
                "{INDETERMINATE_SENTENCE}. Suggested crops for summer season in kerala city: Rice, Coconut, Banana."
            )
        );
    }

    #[test]
    fn invalid_input_surfaces_as_validation_error() {
        let service = service(Box::new(FixedLabel(1)));

        let error = service.recommend(&input("lots", "summer", "delhi")).expect_err("invalid");

        assert!(matches!(error, ApplicationError::Domain(_)));
        assert_eq!(error.validation_errors().map(|errors| errors.fields()), Some(vec!["Nitrogen"]));
    }

    #[test]
    fn classifier_reports_its_stages() {
        let classifier = CropClassifier::new(
            "v2",
            vec![Box::new(Shift(1.0)), Box::new(Shift(2.0))],
            Box::new(FixedLabel(3)),
        );
        assert_eq!(classifier.stages(), vec!["shift", "shift"]);
        assert_eq!(classifier.predictor_kind(), "fixed");
        let normalized = classifier.normalize(&FeatureVector::new([0.0; 7])).expect("normalize");
        assert_eq!(normalized.values(), &[3.0; 7]);
        assert!(format!("{classifier:?}").contains("v2"));
    }
}
