use thiserror::Error;

use crate::domain::input::ValidationErrors;
use crate::model::ModelError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl ApplicationError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Domain(DomainError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }

    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ValidationErrors> for ApplicationError {
    fn from(value: ValidationErrors) -> Self {
        Self::Domain(DomainError::Validation(value))
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(DomainError::Validation(errors)) => Self::BadRequest {
                message: errors.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Model(error) => {
                Self::Internal { message: error.to_string(), correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::input::{FieldError, ValidationErrors};
    use crate::errors::{ApplicationError, InterfaceError};
    use crate::model::ModelError;

    fn missing_nitrogen() -> ValidationErrors {
        ValidationErrors {
            errors: vec![FieldError {
                field: "Nitrogen",
                message: "Nitrogen is required".to_owned(),
            }],
        }
    }

    #[test]
    fn validation_error_maps_to_bad_request_interface_error() {
        let interface = ApplicationError::from(missing_nitrogen()).into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ref message,
            } if correlation_id == "req-1" && message.contains("Nitrogen is required")
        ));
    }

    #[test]
    fn bad_request_has_user_safe_message() {
        let interface = ApplicationError::from(missing_nitrogen()).into_interface("req-2");

        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn model_failure_maps_to_internal() {
        let interface = ApplicationError::from(ModelError::NonFinite { stage: "standard_scaler" })
            .into_interface("req-4");

        assert!(matches!(
            interface,
            InterfaceError::Internal { ref message, .. } if message.contains("standard_scaler")
        ));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }

    #[test]
    fn validation_errors_are_reachable_from_application_error() {
        let error = ApplicationError::from(missing_nitrogen());
        assert_eq!(error.validation_errors().map(|errors| errors.fields()), Some(vec!["Nitrogen"]));
        let model = ApplicationError::from(ModelError::NonFinite { stage: "min_max_scaler" });
        assert!(model.validation_errors().is_none());
    }
}
