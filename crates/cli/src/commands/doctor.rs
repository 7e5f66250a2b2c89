use croprec_core::config::{AppConfig, LoadOptions};
use croprec_core::{CropClassifier, ModelBundle};
use serde::Serialize;
use tera::Tera;

use crate::commands::{CommandResult, EXIT_CONFIG_FAILURE, EXIT_MODEL_FAILURE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report(LoadOptions::default());
    let exit_code = exit_code_for(&report);

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_model_bundle(&config));
            checks.push(check_templates(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("model_bundle"));
            checks.push(skipped("form_template"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: "skipped because configuration did not load".to_string(),
    }
}

fn check_model_bundle(config: &AppConfig) -> DoctorCheck {
    match ModelBundle::load(&config.model.bundle_path) {
        Ok(bundle) => {
            let shape = bundle.classifier.summary();
            let classifier = CropClassifier::from_bundle(bundle);
            DoctorCheck {
                name: "model_bundle",
                status: CheckStatus::Pass,
                details: format!(
                    "loaded `{}` (version {}, {} of {} after {})",
                    config.model.bundle_path.display(),
                    classifier.version(),
                    classifier.predictor_kind(),
                    shape,
                    classifier.stages().join(" + ")
                ),
            }
        }
        Err(error) => {
            DoctorCheck { name: "model_bundle", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

/// Templates are optional on disk; the server embeds the form page. A present but
/// broken template directory still fails the check.
fn check_templates(config: &AppConfig) -> DoctorCheck {
    let dir = &config.web.templates_dir;
    if !dir.is_dir() {
        return DoctorCheck {
            name: "form_template",
            status: CheckStatus::Pass,
            details: format!("`{}` not found, embedded form page will be used", dir.display()),
        };
    }

    let pattern = format!("{}/**/*.html", dir.display());
    match Tera::new(&pattern) {
        Ok(tera) if tera.get_template_names().any(|name| name == "index.html") => DoctorCheck {
            name: "form_template",
            status: CheckStatus::Pass,
            details: format!("`{}` parsed", dir.join("index.html").display()),
        },
        Ok(_) => DoctorCheck {
            name: "form_template",
            status: CheckStatus::Pass,
            details: format!("no index.html in `{}`, embedded form page will be used", dir.display()),
        },
        Err(error) => DoctorCheck {
            name: "form_template",
            status: CheckStatus::Fail,
            details: format!("template parse failed: {error}"),
        },
    }
}

fn exit_code_for(report: &DoctorReport) -> u8 {
    let failed = |name: &str| {
        report.checks.iter().any(|check| check.name == name && check.status == CheckStatus::Fail)
    };

    if failed("config_validation") {
        EXIT_CONFIG_FAILURE
    } else if failed("model_bundle") {
        EXIT_MODEL_FAILURE
    } else if report.overall_status == CheckStatus::Fail {
        1
    } else {
        0
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use croprec_core::config::{ConfigOverrides, LoadOptions};
    use tempfile::TempDir;

    use super::{build_report, exit_code_for, render_human, CheckStatus};

    fn options(bundle: PathBuf, templates: PathBuf) -> LoadOptions {
        LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/croprec.toml")),
            overrides: ConfigOverrides {
                bundle_path: Some(bundle),
                templates_dir: Some(templates),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    fn repo_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").join(relative)
    }

    #[test]
    fn shipped_assets_pass_every_check() {
        let report =
            build_report(options(repo_path("models/crop_model.json"), repo_path("templates")));

        assert_eq!(report.overall_status, CheckStatus::Pass, "{}", render_human(&report));
        assert_eq!(exit_code_for(&report), 0);
        assert!(report.checks[1].details.contains("decision_tree of "));
        assert!(report.checks[1].details.contains(" leaves, depth "));
    }

    #[test]
    fn missing_bundle_fails_with_model_exit_code() {
        let report = build_report(options(
            PathBuf::from("/nonexistent/crop_model.json"),
            repo_path("templates"),
        ));

        assert_eq!(report.overall_status, CheckStatus::Fail);
        assert_eq!(report.checks[1].status, CheckStatus::Fail);
        assert_eq!(exit_code_for(&report), 3);
        assert!(render_human(&report).contains("- [fail] model_bundle"));
    }

    #[test]
    fn broken_template_fails_the_template_check() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("index.html"), "{% if %}").expect("write template");

        let report =
            build_report(options(repo_path("models/crop_model.json"), dir.path().to_path_buf()));

        assert_eq!(report.checks[2].status, CheckStatus::Fail);
        assert_eq!(exit_code_for(&report), 1);
    }
}
