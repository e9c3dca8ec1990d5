use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to parse URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Invalid field schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Extraction service error: {service} - {message}")]
    ServiceError { service: String, message: String },
}

impl ExtractError {
    pub fn log(&self) {
        match self {
            ExtractError::UrlParseError(e) => {
                warn!(error = %e, "URL parsing failed");
            }
            ExtractError::InvalidSchema(e) => {
                error!(error = %e, "Field schema rejected");
            }
            ExtractError::InvalidConfiguration(e) => {
                error!(error = %e, "Configuration rejected");
            }
            ExtractError::ServiceError { service, message } => {
                error!(
                    service = %service,
                    error = %message,
                    "Extraction service error occurred"
                );
            }
        }
    }
}
