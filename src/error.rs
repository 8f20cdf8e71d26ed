use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "qanswer.endpoint_url", "questions[0].question.answers")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "qanswer", "cached_http_client")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the components.
///
/// `RequestFailed` and `ResultFormat` are kept apart so callers can tell an
/// unreachable service from one that answered with something unusable.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Request failed{}: {message}{}", format_status(.status), format_context(.context))]
    RequestFailed {
        /// HTTP status when the service answered, `None` for transport failures.
        status: Option<u16>,
        message: String,
        context: ErrorContext,
    },

    #[error("Result format error: {message}{}", format_context(.context))]
    ResultFormat {
        message: String,
        context: ErrorContext,
    },

    #[error("Triplestore error: {message}{}", format_context(.context))]
    TripleStore {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (HTTP {})", s),
        None => String::new(),
    }
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn request_failed(status: Option<u16>, msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::RequestFailed {
            status,
            message: msg.into(),
            context,
        }
    }

    pub fn result_format_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::ResultFormat {
            message: msg.into(),
            context,
        }
    }

    pub fn triplestore_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::TripleStore {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Validation { context, .. }
            | Error::RequestFailed { context, .. }
            | Error::ResultFormat { context, .. }
            | Error::TripleStore { context, .. } => Some(context),
            _ => None,
        }
    }

    /// True for failures of the outbound call itself (as opposed to its payload).
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Error::RequestFailed { .. } | Error::Transport(_))
    }
}
