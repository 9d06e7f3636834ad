//! Typed error handling for billed
//!
//! Every failure the views and containers can meet is one of the categories
//! below, so callers match on what went wrong instead of parsing messages.
//!
//! # Error Categories
//!
//! - [`StoreError`]: rejections from the bills/users store
//! - [`ValidationError`]: rejected receipts and invalid form input
//! - [`FormatError`]: a raw value that cannot be displayed, recovered by
//!   the formatters' callers
//! - [`ViewError`]: template rendering failures
//! - [`SessionError`]: unreadable session content
//! - [`ConfigError`]: configuration parsing
//!
//! # Example
//!
//! ```rust,ignore
//! // `get_bills_list` fails with a `StoreError`; `?` lifts the other
//! // categories into `BilledError`
//! let html = match bills.get_bills_list().await {
//!     Ok(list) => render(&list)?,
//!     Err(StoreError::NotFound { message }) => error_page(&message)?,
//!     Err(e) => return Err(BilledError::from(e)),
//! };
//! ```

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for billed
#[derive(Debug)]
pub enum BilledError {
    /// Store call rejected
    Store(StoreError),

    /// Input rejected before reaching the store
    Validation(ValidationError),

    /// Template rendering failed
    View(ViewError),

    /// Session content could not be read
    Session(SessionError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (poisoned locks and the like)
    Internal(String),
}

impl fmt::Display for BilledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BilledError::Store(e) => write!(f, "{}", e),
            BilledError::Validation(e) => write!(f, "{}", e),
            BilledError::View(e) => write!(f, "{}", e),
            BilledError::Session(e) => write!(f, "{}", e),
            BilledError::Config(e) => write!(f, "{}", e),
            BilledError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BilledError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BilledError::Store(e) => Some(e),
            BilledError::Validation(e) => Some(e),
            BilledError::View(e) => Some(e),
            BilledError::Session(e) => Some(e),
            BilledError::Config(e) => Some(e),
            BilledError::Internal(_) => None,
        }
    }
}

impl BilledError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BilledError::Store(e) => e.status_code(),
            BilledError::Validation(_) => StatusCode::BAD_REQUEST,
            BilledError::View(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BilledError::Session(_) => StatusCode::BAD_REQUEST,
            BilledError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BilledError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BilledError::Store(e) => e.error_code(),
            BilledError::Validation(_) => "VALIDATION_ERROR",
            BilledError::View(_) => "VIEW_ERROR",
            BilledError::Session(_) => "SESSION_ERROR",
            BilledError::Config(_) => "CONFIG_ERROR",
            BilledError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to a serializable error body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Error body used by the JSON endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Errors reaching the HTTP layer are shown on the error page
impl IntoResponse for BilledError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match crate::views::error_page(&self.to_string()) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(render_err) => {
                tracing::error!(error = %render_err, "failed to render error page");
                (status, self.to_string()).into_response()
            }
        }
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Rejections returned by a [`Store`](crate::core::store::Store)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The requested resource does not exist
    #[error("{message}")]
    NotFound { message: String },

    /// The store failed while serving the call
    #[error("{message}")]
    ServerError { message: String },

    /// The store refused the payload
    #[error("{message}")]
    Rejected { message: String },
}

impl StoreError {
    /// `Erreur 404`
    pub fn not_found() -> Self {
        StoreError::NotFound {
            message: "Erreur 404".to_string(),
        }
    }

    /// `Erreur 500`
    pub fn server_error() -> Self {
        StoreError::ServerError {
            message: "Erreur 500".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::ServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::Rejected { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "STORE_NOT_FOUND",
            StoreError::ServerError { .. } => "STORE_SERVER_ERROR",
            StoreError::Rejected { .. } => "STORE_REJECTED",
        }
    }
}

impl From<StoreError> for BilledError {
    fn from(err: StoreError) -> Self {
        BilledError::Store(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Input rejected before any store call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The receipt extension is not in the allow-list
    #[error("Le fichier '{file_name}' n'est pas une image acceptée")]
    UnsupportedFile { file_name: String },

    /// No file was selected
    #[error("Aucun fichier sélectionné")]
    MissingFile,

    /// The multipart body could not be read
    #[error("Envoi du fichier invalide: {message}")]
    MalformedUpload { message: String },

    /// One or more form fields are invalid
    #[error("Champs invalides: {}", join_fields(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_fields(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        // field_errors() iterates a HashMap
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<ValidationError> for BilledError {
    fn from(err: ValidationError) -> Self {
        BilledError::Validation(err)
    }
}

// =============================================================================
// Format Errors
// =============================================================================

/// A raw value that cannot be turned into its display form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Invalid date '{raw}'")]
    InvalidDate { raw: String },
}

// =============================================================================
// View Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The embedded templates failed to compile
    #[error("Failed to load templates: {message}")]
    Templates { message: String },

    #[error("Failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: tera::Error,
    },
}

impl From<ViewError> for BilledError {
    fn from(err: ViewError) -> Self {
        BilledError::View(err)
    }
}

// =============================================================================
// Session Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The value stored under `key` is not the expected JSON
    #[error("Session key '{key}' holds invalid data: {message}")]
    InvalidValue { key: String, message: String },
}

impl From<SessionError> for BilledError {
    fn from(err: SessionError) -> Self {
        BilledError::Session(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", describe_file(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn describe_file(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl From<ConfigError> for BilledError {
    fn from(err: ConfigError) -> Self {
        BilledError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for billed operations
pub type BilledResult<T> = Result<T, BilledError>;

// =============================================================================
// Tests
// =============================================================================
