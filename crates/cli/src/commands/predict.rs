use std::sync::Arc;

use croprec_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use croprec_core::{
    ApplicationError, CropClassifier, Feature, ModelBundle, RecommendationInput,
    RecommendationService, SeasonCityAdvisor,
};
use serde_json::json;

use crate::commands::{
    CommandResult, EXIT_CONFIG_FAILURE, EXIT_INPUT_FAILURE, EXIT_MODEL_FAILURE,
};
use crate::PredictArgs;

pub fn run(args: PredictArgs) -> CommandResult {
    let options = LoadOptions {
        overrides: ConfigOverrides { bundle_path: args.bundle.clone(), ..ConfigOverrides::default() },
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "predict",
                "config_validation",
                error.to_string(),
                EXIT_CONFIG_FAILURE,
            )
        }
    };

    let bundle = match ModelBundle::load(&config.model.bundle_path) {
        Ok(bundle) => bundle,
        Err(error) => {
            return CommandResult::failure_with_data(
                "predict",
                "model_load",
                error.to_string(),
                EXIT_MODEL_FAILURE,
                Some(json!({ "bundle_path": config.model.bundle_path.display().to_string() })),
            )
        }
    };

    let service = RecommendationService::new(
        Arc::new(CropClassifier::from_bundle(bundle)),
        Arc::new(SeasonCityAdvisor::builtin()),
    );

    match service.recommend(&input_from(&args)) {
        Ok(recommendation) => {
            let data = serde_json::to_value(&recommendation).ok();
            CommandResult::success_with_data("predict", recommendation.message, data)
        }
        Err(error) => failure_for(error),
    }
}

fn input_from(args: &PredictArgs) -> RecommendationInput {
    let mut input = RecommendationInput {
        season: args.season.clone(),
        city: args.city.clone(),
        ..RecommendationInput::default()
    };
    let readings = [
        (Feature::Nitrogen, &args.nitrogen),
        (Feature::Phosphorus, &args.phosphorus),
        (Feature::Potassium, &args.potassium),
        (Feature::Temperature, &args.temperature),
        (Feature::Humidity, &args.humidity),
        (Feature::Ph, &args.ph),
        (Feature::Rainfall, &args.rainfall),
    ];
    for (feature, value) in readings {
        if let Some(value) = value {
            input.set_reading(feature, value.as_str());
        }
    }
    input
}

fn failure_for(error: ApplicationError) -> CommandResult {
    if let Some(errors) = error.validation_errors() {
        return CommandResult::failure_with_data(
            "predict",
            "input_validation",
            errors.to_string(),
            EXIT_INPUT_FAILURE,
            Some(json!({ "fields": errors.fields() })),
        );
    }

    CommandResult::failure("predict", "model_evaluation", error.to_string(), EXIT_MODEL_FAILURE)
}

#[cfg(test)]
mod tests {
    use croprec_core::Feature;

    use super::input_from;
    use crate::PredictArgs;

    #[test]
    fn flags_map_onto_form_fields() {
        let args = PredictArgs {
            nitrogen: Some("90".to_string()),
            phosphorus: Some("42".to_string()),
            season: Some("rainy".to_string()),
            ..PredictArgs::default()
        };

        let input = input_from(&args);

        assert_eq!(input.reading(Feature::Phosphorus).map(|value| value.display()), Some("42".to_string()));
        assert!(input.reading(Feature::Rainfall).is_none());
        assert_eq!(input.season.as_deref(), Some("rainy"));
        assert!(input.city.is_none());
    }
}
