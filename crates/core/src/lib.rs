pub mod advisor;
pub mod config;
pub mod domain;
pub mod errors;
pub mod model;
pub mod recommendation;

pub use advisor::{SeasonCityAdvisor, NO_CITY_SUGGESTIONS, NO_SEASON_SUGGESTIONS};
pub use domain::crop::{CropLabel, CROP_NAMES};
pub use domain::features::{Feature, FeatureVector, FEATURE_COUNT};
pub use domain::input::{FieldError, FieldValue, RecommendationInput, RecommendationRequest, ValidationErrors};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use model::{ModelBundle, ModelError, Predictor, Transformer};
pub use recommendation::{
    compose_message, Classification, CropClassifier, Recommendation, RecommendationService,
    INDETERMINATE_SENTENCE,
};
