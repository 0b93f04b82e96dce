//! Standardized error mapping for registry responses and user input

use crate::error::{PrunerError, Result};
use reqwest::StatusCode;

/// Registry hosts a repository may live on
pub const ALLOWED_REGISTRY_HOSTS: &[&str] = &["gcr.io", "us.gcr.io", "eu.gcr.io", "asia.gcr.io"];

/// Standard error handler for HTTP responses
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Handle token exchange HTTP errors
    pub fn handle_auth_error(status: StatusCode, error_text: &str) -> PrunerError {
        let error_msg = match status.as_u16() {
            400 => format!("Invalid token request parameters: {}", error_text),
            401 => format!("Identity token rejected by registry: {}", error_text),
            403 => format!("Access denied - insufficient permissions: {}", error_text),
            404 => "Token endpoint not found".to_string(),
            _ => format!("Token exchange failed (status {}): {}", status, error_text),
        };

        PrunerError::Authentication(error_msg)
    }

    /// Handle registry-related HTTP errors
    pub fn handle_registry_error(
        status: StatusCode,
        error_text: &str,
        operation: &str,
    ) -> PrunerError {
        let error_msg = match status.as_u16() {
            401 => format!(
                "Unauthorized to perform {} operation: {}",
                operation, error_text
            ),
            403 => format!(
                "Forbidden: insufficient permissions for {}: {}",
                operation, error_text
            ),
            404 => format!("Repository not found for {}: {}", operation, error_text),
            429 => format!("Rate limited during {}: {}", operation, error_text),
            500 => format!("Registry server error during {}: {}", operation, error_text),
            502 | 503 => format!("Registry unavailable for {}: {}", operation, error_text),
            _ => format!("{} failed (status {}): {}", operation, status, error_text),
        };

        PrunerError::Registry(error_msg)
    }
}

/// Network error categorization and handling
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    /// Categorize and format network errors with helpful context
    pub fn handle_network_error(error: &reqwest::Error, context: &str) -> PrunerError {
        if error.is_timeout() {
            PrunerError::Network(format!("{} timed out: {}", context, error))
        } else if error.is_connect() {
            PrunerError::Network(format!("Connection error during {}: {}", context, error))
        } else if error.is_decode() {
            PrunerError::Parse(format!("Malformed response during {}: {}", context, error))
        } else {
            PrunerError::Network(format!("{} network error: {}", context, error))
        }
    }
}

/// Validation error utilities
pub struct ValidationErrorHandler;

impl ValidationErrorHandler {
    /// Retention count must be a positive integer
    pub fn validate_keep(keep: i64) -> Result<usize> {
        if keep <= 0 {
            return Err(PrunerError::Configuration(format!(
                "Keep must be a positive integer, got {}",
                keep
            )));
        }

        usize::try_from(keep)
            .map_err(|_| PrunerError::Configuration(format!("Keep value {} is too large", keep)))
    }

    pub fn validate_registry_host(host: &str) -> Result<()> {
        if ALLOWED_REGISTRY_HOSTS.contains(&host) {
            Ok(())
        } else {
            Err(PrunerError::Configuration(format!(
                "Repository host '{}' must be one of [{}]",
                host,
                ALLOWED_REGISTRY_HOSTS.join(", ")
            )))
        }
    }

    pub fn validate_repository_path(path: &str) -> Result<()> {
        if path.trim_matches('/').is_empty() {
            return Err(PrunerError::Configuration(
                "Repository path cannot be empty (expected <host>/<project>/<image>)".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_must_be_positive() {
        assert_eq!(ValidationErrorHandler::validate_keep(5).unwrap(), 5);
        assert!(matches!(
            ValidationErrorHandler::validate_keep(0),
            Err(PrunerError::Configuration(_))
        ));
        assert!(ValidationErrorHandler::validate_keep(-3).is_err());
    }

    #[test]
    fn only_gcr_hosts_are_allowed() {
        for host in ALLOWED_REGISTRY_HOSTS {
            assert!(ValidationErrorHandler::validate_registry_host(host).is_ok());
        }
        assert!(ValidationErrorHandler::validate_registry_host("docker.io").is_err());
        assert!(ValidationErrorHandler::validate_registry_host("evil.gcr.io").is_err());
    }

    #[test]
    fn registry_errors_carry_operation_and_status() {
        let err = HttpErrorHandler::handle_registry_error(
            StatusCode::FORBIDDEN,
            "denied",
            "tag listing",
        );
        let message = err.to_string();
        assert!(message.contains("tag listing"));
        assert!(message.contains("denied"));

        let err = HttpErrorHandler::handle_auth_error(StatusCode::UNAUTHORIZED, "bad token");
        assert!(matches!(err, PrunerError::Authentication(_)));
    }
}
