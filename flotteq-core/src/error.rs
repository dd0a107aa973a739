//! Error types for the FlotteQ core library.
//!
//! This module provides a unified error handling system for all booking
//! operations, including configuration, backend API access, and the booking
//! wizard itself.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Config | Environment, config file, and validation errors |
//! | E2001-E2099 | Api | Backend request, parse, auth, and availability errors |
//! | E3001-E3099 | Booking | Wizard preconditions and booking submission errors |
//! | E9001-E9099 | General | Internal, IO, serialization, and validation errors |

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the FlotteQ core library.
///
/// Covers all error conditions that can occur while listing vehicles,
/// querying slot availability, and driving a booking through the wizard.
#[derive(Debug, Error)]
pub enum FlotteqError {
    // ========================================================================
    // Configuration Errors (E1001-E1099)
    // ========================================================================
    /// Required environment variable is missing
    #[error("[E1001] Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has invalid value
    #[error("[E1002] Invalid environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// Configuration file parse error
    #[error("[E1003] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E1004] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    // ========================================================================
    // Backend API Errors (E2001-E2099)
    // ========================================================================
    /// API request failed
    #[error("[E2001] API request failed: {0}")]
    ApiRequestFailed(String),

    /// API response parse error
    #[error("[E2002] Failed to parse API response: {0}")]
    ApiParseError(String),

    /// API authentication failed
    #[error("[E2003] API authentication failed: {0}")]
    ApiAuthenticationFailed(String),

    /// API service unavailable
    #[error("[E2004] API service unavailable: {0}")]
    ApiServiceUnavailable(String),

    /// API request timed out
    #[error("[E2005] API request timed out after {0} seconds")]
    ApiTimeout(u64),

    /// API rate limit exceeded
    #[error("[E2006] API rate limit exceeded, retry after {retry_after_secs} seconds")]
    ApiRateLimitExceeded { retry_after_secs: u64 },

    // ========================================================================
    // Booking Errors (E3001-E3099)
    // ========================================================================
    /// Vehicle id is not in the caller's vehicle list
    #[error("[E3001] Vehicle not found: {0}")]
    VehicleNotFound(String),

    /// The caller has no vehicles to book for
    #[error("[E3002] No vehicles registered for this account")]
    NoVehiclesRegistered,

    /// Requested date lies before today
    #[error("[E3003] Date {0} is in the past")]
    PastDateRejected(NaiveDate),

    /// Chosen window is not among the available slots for the displayed date
    #[error("[E3004] Slot {window} is not available on {date}")]
    SlotUnavailable { date: NaiveDate, window: String },

    /// Confirm was invoked with a required draft field still unset
    #[error("[E3005] Booking draft is incomplete: missing {0}")]
    IncompleteDraft(&'static str),

    /// A booking submission is already in flight
    #[error("[E3006] A booking submission is already in progress")]
    SubmissionInFlight,

    /// The wizard was closed or cancelled
    #[error("[E3007] Booking wizard is closed")]
    WizardClosed,

    /// The backend rejected the booking request
    #[error("[E3008] Booking rejected: {message}")]
    BookingRejected { message: String },

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// Validation error
    #[error("[E9002] Validation error: {0}")]
    ValidationError(String),

    /// IO error
    #[error("[E9003] IO error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("[E9004] Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for FlotteQ operations.
pub type FlotteqResult<T> = Result<T, FlotteqError>;

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

impl From<reqwest::Error> for FlotteqError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FlotteqError::ApiTimeout(30)
        } else if err.is_connect() {
            FlotteqError::ApiServiceUnavailable(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 429 {
                    return FlotteqError::ApiRateLimitExceeded {
                        retry_after_secs: 60,
                    };
                } else if status.as_u16() == 401 || status.as_u16() == 403 {
                    return FlotteqError::ApiAuthenticationFailed(status.to_string());
                }
            }
            FlotteqError::ApiRequestFailed(err.to_string())
        } else if err.is_decode() {
            FlotteqError::ApiParseError(err.to_string())
        } else {
            FlotteqError::ApiRequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FlotteqError {
    fn from(err: serde_json::Error) -> Self {
        FlotteqError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for FlotteqError {
    fn from(err: std::io::Error) -> Self {
        FlotteqError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for FlotteqError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => FlotteqError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => FlotteqError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => FlotteqError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => FlotteqError::ConfigParseError(err.to_string()),
        }
    }
}

impl From<std::env::VarError> for FlotteqError {
    fn from(err: std::env::VarError) -> Self {
        match err {
            std::env::VarError::NotPresent => {
                FlotteqError::MissingEnvVar("(unspecified)".to_string())
            }
            std::env::VarError::NotUnicode(_) => FlotteqError::InvalidEnvVar {
                name: "(unspecified)".to_string(),
                message: "Value is not valid Unicode".to_string(),
            },
        }
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl FlotteqError {
    /// Returns true if this error is related to configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FlotteqError::MissingEnvVar(_)
                | FlotteqError::InvalidEnvVar { .. }
                | FlotteqError::ConfigParseError(_)
                | FlotteqError::InvalidConfigValue { .. }
        )
    }

    /// Returns true if this error is related to backend API access.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            FlotteqError::ApiRequestFailed(_)
                | FlotteqError::ApiParseError(_)
                | FlotteqError::ApiAuthenticationFailed(_)
                | FlotteqError::ApiServiceUnavailable(_)
                | FlotteqError::ApiTimeout(_)
                | FlotteqError::ApiRateLimitExceeded { .. }
        )
    }

    /// Returns true if this error is related to the booking wizard or submission.
    pub fn is_booking_error(&self) -> bool {
        matches!(
            self,
            FlotteqError::VehicleNotFound(_)
                | FlotteqError::NoVehiclesRegistered
                | FlotteqError::PastDateRejected(_)
                | FlotteqError::SlotUnavailable { .. }
                | FlotteqError::IncompleteDraft(_)
                | FlotteqError::SubmissionInFlight
                | FlotteqError::WizardClosed
                | FlotteqError::BookingRejected { .. }
        )
    }

    /// Returns true if this error is transient and the operation might succeed on retry.
    ///
    /// Booking submission is never retried by the wizard itself; this
    /// classification drives read-path messaging in the CLI only.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FlotteqError::ApiServiceUnavailable(_)
                | FlotteqError::ApiTimeout(_)
                | FlotteqError::ApiRateLimitExceeded { .. }
        )
    }

    /// Returns a suggested retry delay in seconds if the error is transient.
    pub fn suggested_retry_delay(&self) -> Option<u64> {
        match self {
            FlotteqError::ApiRateLimitExceeded {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            FlotteqError::ApiServiceUnavailable(_) => Some(5),
            FlotteqError::ApiTimeout(_) => Some(10),
            _ => None,
        }
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            FlotteqError::MissingEnvVar(_) => "E1001",
            FlotteqError::InvalidEnvVar { .. } => "E1002",
            FlotteqError::ConfigParseError(_) => "E1003",
            FlotteqError::InvalidConfigValue { .. } => "E1004",
            FlotteqError::ApiRequestFailed(_) => "E2001",
            FlotteqError::ApiParseError(_) => "E2002",
            FlotteqError::ApiAuthenticationFailed(_) => "E2003",
            FlotteqError::ApiServiceUnavailable(_) => "E2004",
            FlotteqError::ApiTimeout(_) => "E2005",
            FlotteqError::ApiRateLimitExceeded { .. } => "E2006",
            FlotteqError::VehicleNotFound(_) => "E3001",
            FlotteqError::NoVehiclesRegistered => "E3002",
            FlotteqError::PastDateRejected(_) => "E3003",
            FlotteqError::SlotUnavailable { .. } => "E3004",
            FlotteqError::IncompleteDraft(_) => "E3005",
            FlotteqError::SubmissionInFlight => "E3006",
            FlotteqError::WizardClosed => "E3007",
            FlotteqError::BookingRejected { .. } => "E3008",
            FlotteqError::Internal(_) => "E9001",
            FlotteqError::ValidationError(_) => "E9002",
            FlotteqError::IoError(_) => "E9003",
            FlotteqError::SerializationError(_) => "E9004",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            FlotteqError::MissingEnvVar(_) => {
                Some("Create a .env file or set the environment variable")
            }
            FlotteqError::ApiAuthenticationFailed(_) => {
                Some("Check FLOTTEQ_API_TOKEN in your configuration")
            }
            FlotteqError::ApiServiceUnavailable(_) => {
                Some("The FlotteQ backend is unreachable. Check FLOTTEQ_API_URL and try again")
            }
            FlotteqError::ApiRateLimitExceeded { .. } => {
                Some("Wait for the rate limit to reset before retrying")
            }
            FlotteqError::NoVehiclesRegistered => {
                Some("Add a vehicle to your account before booking a service")
            }
            FlotteqError::PastDateRejected(_) => Some("Pick today or a later date"),
            FlotteqError::SlotUnavailable { .. } => {
                Some("Run 'flotteq slots' to see current availability for that date")
            }
            FlotteqError::BookingRejected { .. } => {
                Some("The draft is preserved; pick another slot and confirm again")
            }
            _ => None,
        }
    }

    /// The human-readable message to surface for a failed submission.
    ///
    /// Prefers the structured server message when present, otherwise the
    /// generic error display.
    pub fn submission_message(&self) -> String {
        match self {
            FlotteqError::BookingRejected { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with suggestions and retry hints.
pub struct CliErrorDisplay<'a> {
    error: &'a FlotteqError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a FlotteqError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Main error message (already includes code)
        writeln!(f, "{}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        if self.error.is_transient() {
            if let Some(delay) = self.error.suggested_retry_delay() {
                writeln!(f)?;
                writeln!(
                    f,
                    "  This error may be temporary. Try again in {} seconds.",
                    delay
                )?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
