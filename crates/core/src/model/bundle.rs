use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::features::{Feature, FEATURE_COUNT};
use crate::model::scaler::{MinMaxParams, StandardParams};
use crate::model::tree::ClassifierParams;
use crate::model::{Classifier, MinMaxScaler, ModelError, Predictor, StandardScaler};

/// On-disk layout written by the training job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BundleDocument {
    pub version: String,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub min_max: MinMaxParams,
    pub standard: StandardParams,
    pub classifier: ClassifierParams,
}

/// Validated, ready-to-evaluate model state.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelBundle {
    pub version: String,
    pub feature_names: Vec<String>,
    pub min_max: MinMaxScaler,
    pub standard: StandardScaler,
    pub classifier: Classifier,
}

impl ModelBundle {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ModelError::ReadBundle { path: path.to_path_buf(), source })?;
        let bundle = Self::from_json(&raw)?;

        info!(
            event_name = "model.bundle.loaded",
            correlation_id = "bootstrap",
            path = %path.display(),
            version = %bundle.version,
            classifier = bundle.classifier.kind(),
            shape = %bundle.classifier.summary(),
            "model bundle loaded"
        );
        Ok(bundle)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let document: BundleDocument = serde_json::from_str(raw).map_err(ModelError::ParseBundle)?;
        Self::from_document(document)
    }

    pub fn from_document(document: BundleDocument) -> Result<Self, ModelError> {
        let version = document.version.trim().to_string();
        if version.is_empty() {
            return Err(ModelError::InvalidBundle("version must not be empty".to_string()));
        }
        if !document.feature_names.is_empty() && document.feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidBundle(format!(
                "feature_names must list {FEATURE_COUNT} columns, got {}",
                document.feature_names.len()
            )));
        }
        for (index, (name, feature)) in document.feature_names.iter().zip(Feature::ALL).enumerate() {
            if name.trim() != feature.bundle_name() {
                return Err(ModelError::InvalidBundle(format!(
                    "feature_names[{index}] is `{name}`, expected `{}`",
                    feature.bundle_name()
                )));
            }
        }

        Ok(Self {
            version,
            feature_names: document.feature_names,
            min_max: MinMaxScaler::from_params(&document.min_max)?,
            standard: StandardScaler::from_params(&document.standard)?,
            classifier: Classifier::from_params(document.classifier)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::ModelBundle;
    use crate::model::{ModelError, Predictor};

    const SAMPLE_BUNDLE: &str = r#"{
        "version": "test-1",
        "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
        "min_max": {
            "data_min": [0, 5, 5, 8.8, 14.3, 3.5, 20.2],
            "data_max": [140, 145, 205, 43.7, 100, 9.9, 298.6]
        },
        "standard": {
            "mean": [0.36, 0.31, 0.24, 0.51, 0.83, 0.51, 0.37],
            "scale": [0.26, 0.23, 0.25, 0.15, 0.22, 0.12, 0.19]
        },
        "classifier": {
            "kind": "decision_tree",
            "nodes": [
                {"feature": 6, "threshold": 0.0, "left": 1, "right": 2},
                {"label": 2},
                {"label": 1}
            ]
        }
    }"#;

    #[test]
    fn sample_bundle_parses_with_default_feature_range() {
        let bundle = ModelBundle::from_json(SAMPLE_BUNDLE).expect("sample bundle should load");
        assert_eq!(bundle.version, "test-1");
        assert_eq!(bundle.feature_names.len(), 7);
        assert_eq!(bundle.classifier.kind(), "decision_tree");
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("model.json");
        fs::write(&path, SAMPLE_BUNDLE).expect("write bundle");

        let bundle = ModelBundle::load(&path).expect("bundle should load");
        assert_eq!(bundle.version, "test-1");
    }

    #[test]
    fn missing_file_reports_path() {
        let error = ModelBundle::load(std::path::Path::new("/nonexistent/croprec/model.json"))
            .expect_err("missing file");
        assert!(matches!(error, ModelError::ReadBundle { .. }));
        assert!(error.to_string().contains("/nonexistent/croprec/model.json"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = ModelBundle::from_json("{\"version\": ").expect_err("truncated json");
        assert!(matches!(error, ModelError::ParseBundle(_)));
    }

    #[test]
    fn wrong_feature_name_count_is_invalid() {
        let raw = SAMPLE_BUNDLE.replace(r#""N", "P", "#, "");
        let error = ModelBundle::from_json(&raw).expect_err("five feature names");
        assert!(matches!(error, ModelError::InvalidBundle(message) if message.contains("feature_names")));
    }

    #[test]
    fn reordered_feature_names_are_invalid() {
        let raw = SAMPLE_BUNDLE.replace(
            r#"["N", "P", "K", "temperature", "humidity", "ph", "rainfall"]"#,
            r#"["rainfall", "P", "K", "temperature", "humidity", "ph", "N"]"#,
        );
        let error = ModelBundle::from_json(&raw).expect_err("swapped columns");
        assert!(matches!(
            error,
            ModelError::InvalidBundle(message) if message.contains("feature_names[0] is `rainfall`, expected `N`")
        ));
    }

    #[test]
    fn shipped_bundle_lists_columns_in_order() {
        let raw = include_str!("../../../../models/crop_model.json");
        let bundle = ModelBundle::from_json(raw).expect("shipped bundle should load");
        assert_eq!(bundle.feature_names, ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"]);
    }

    #[test]
    fn blank_version_is_invalid() {
        let raw = SAMPLE_BUNDLE.replace("\"test-1\"", "\"  \"");
        assert!(matches!(ModelBundle::from_json(&raw), Err(ModelError::InvalidBundle(_))));
    }
}
