use crate::config::ConfigError;
use crate::lifecycle::{LifecycleError, ValidationError};
use crate::live::StreamError;
use crate::repository::RepositoryError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Lifecycle(LifecycleError),
    Observation(StreamError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Lifecycle(LifecycleError::Validation(
                ValidationError::HousingHasActiveLease { .. },
            )) => StatusCode::CONFLICT,
            AppError::Lifecycle(LifecycleError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Lifecycle(LifecycleError::Persistence(err)) => repository_status(err),
            AppError::Observation(err) => repository_status(err.cause()),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Lifecycle(err) => write!(f, "{}", err),
            AppError::Observation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Lifecycle(err) => Some(err),
            AppError::Observation(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<LifecycleError> for AppError {
    fn from(value: LifecycleError) -> Self {
        Self::Lifecycle(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Lifecycle(value.into())
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Lifecycle(value.into())
    }
}

impl From<StreamError> for AppError {
    fn from(value: StreamError) -> Self {
        Self::Observation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HousingId;

    #[test]
    fn blocked_deletion_maps_to_conflict() {
        let err = AppError::from(ValidationError::HousingHasActiveLease {
            housing_id: HousingId(3),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn rule_violations_map_to_unprocessable() {
        let err = AppError::from(ValidationError::RentDueDayOutOfRange { found: 31 });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let err = AppError::from(RepositoryError::NotFound {
            entity: "lease",
            id: 8,
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let observed = AppError::from(StreamError::from(RepositoryError::Unavailable(
            "offline".to_string(),
        )));
        assert_eq!(observed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
