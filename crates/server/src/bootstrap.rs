use std::sync::Arc;

use croprec_core::config::{AppConfig, ConfigError, LoadOptions};
use croprec_core::{CropClassifier, ModelBundle, ModelError, RecommendationService, SeasonCityAdvisor};
use thiserror::Error;
use tracing::info;

use crate::web::{self, AppState};

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("model bundle failed to load: {0}")]
    Model(#[source] ModelError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        bundle_path = %config.model.bundle_path.display(),
        "starting application bootstrap"
    );

    let bundle = ModelBundle::load(&config.model.bundle_path).map_err(BootstrapError::Model)?;
    let classifier = CropClassifier::from_bundle(bundle);
    let advisor = SeasonCityAdvisor::builtin();
    info!(
        event_name = "system.bootstrap.model_ready",
        correlation_id = "bootstrap",
        model_version = classifier.version(),
        classifier = classifier.predictor_kind(),
        seasons = advisor.seasons().len(),
        "recommendation pipeline ready"
    );

    let service = RecommendationService::new(Arc::new(classifier), Arc::new(advisor));
    let templates = web::init_templates(&config.web.templates_dir);

    Ok(Application { state: AppState::new(service, templates), config })
}

impl Application {
    pub fn router(&self) -> axum::Router {
        web::router(self.state.clone(), &self.config.web.static_dir)
    }
}
