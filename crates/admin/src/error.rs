use domain::resource::FilterError;
use domain::services::GatewayError;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error surfaced by list controllers.
///
/// A missing record and a rejected input are the only two failure kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdminError {
    #[error("Not found: {resource} {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
}

/// Serializable error shape for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl AdminError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::NotFound { .. } => ErrorKind::NotFound,
            AdminError::Validation { .. } => ErrorKind::Validation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            AdminError::NotFound { resource, id } => ErrorBody {
                error: ErrorKind::NotFound,
                message: format!("{} {} not found", resource, id),
                details: Vec::new(),
            },
            AdminError::Validation { message, details } => ErrorBody {
                error: ErrorKind::Validation,
                message: message.clone(),
                details: details.clone(),
            },
        }
    }
}

impl Serialize for AdminError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_body().serialize(serializer)
    }
}

impl From<GatewayError> for AdminError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound { resource, id } => AdminError::NotFound { resource, id },
        }
    }
}

impl From<FilterError> for AdminError {
    fn from(err: FilterError) -> Self {
        let field = match &err {
            FilterError::UnknownField { field, .. } => field.clone(),
            FilterError::InvalidValue { field, .. } => field.clone(),
        };
        let message = err.to_string();
        AdminError::Validation {
            details: vec![ValidationDetail {
                field,
                message: message.clone(),
            }],
            message,
        }
    }
}

impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        AdminError::Validation { message, details }
    }
}
