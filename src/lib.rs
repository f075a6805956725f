//! # gpay-checkout - Google Pay checkout orchestration
//!
//! Probes whether the wallet can pay on the current device, collects a
//! tokenized card from the wallet's payment sheet and forwards the token to
//! the merchant backend. The wallet itself is injected through
//! [`wallet::PaymentsClientFactory`]; the backend is reached over HTTP.

pub mod backend;
pub mod client;
pub mod error;
pub mod types;
pub mod validation;
pub mod wallet;

// Re-exports for convenience
pub use client::{ButtonOutcome, Callbacks, Checkout, PaymentOutcome};
pub use error::{GPayError, Result, ValidationError};
pub use types::*;
pub use wallet::{PaymentsClient, PaymentsClientFactory, SharedPaymentsClient, WalletError};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
