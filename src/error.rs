//! Error types for the checkout library

use crate::validation::CheckKind;
use crate::wallet::WalletError;
use thiserror::Error;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, GPayError>;

/// Main error type for checkout operations
#[derive(Error, Debug)]
pub enum GPayError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend URL could not be built
    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    /// Wallet SDK rejected a call
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// Options or callbacks failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No backend URL was supplied with the options
    #[error("Backend request URL is missing")]
    MissingRequestUrl,

    /// Backend answered with a non-success HTTP status
    #[error("Backend responded with status {status}")]
    BackendStatus { status: u16 },

    /// Backend answered with a result code other than the success sentinel
    #[error("Backend rejected payment: code {code}")]
    BackendRejected { code: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl GPayError {
    /// Create a backend rejection error
    pub fn backend_rejected(code: impl Into<String>) -> Self {
        Self::BackendRejected { code: code.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Reasons the parameter validator refuses a call.
///
/// Every variant carries the kind of operation that was being validated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("options for {0} are missing")]
    MissingOptions(CheckKind),

    #[error("callbacks for {0} are missing")]
    MissingCallbacks(CheckKind),

    #[error("fail callback for {0} is missing")]
    MissingFailCallback(CheckKind),

    #[error("success callback for {0} is missing")]
    MissingSuccessCallback(CheckKind),

    #[error("setPaymentClient callback for {0} is missing")]
    MissingClientSetter(CheckKind),

    #[error("payments client for {0} is missing")]
    MissingPaymentsClient(CheckKind),
}

impl ValidationError {
    /// Name of the option or callback that was missing
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingOptions(_) => "options",
            Self::MissingCallbacks(_) => "callbacks",
            Self::MissingFailCallback(_) => "callbacks.fail",
            Self::MissingSuccessCallback(_) => "callbacks.success",
            Self::MissingClientSetter(_) => "callbacks.setPaymentClient",
            Self::MissingPaymentsClient(_) => "options.paymentsClient",
        }
    }

    /// Operation that was being validated
    pub fn kind(&self) -> CheckKind {
        match *self {
            Self::MissingOptions(kind)
            | Self::MissingCallbacks(kind)
            | Self::MissingFailCallback(kind)
            | Self::MissingSuccessCallback(kind)
            | Self::MissingClientSetter(kind)
            | Self::MissingPaymentsClient(kind) => kind,
        }
    }
}
