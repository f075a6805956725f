//! Wallet SDK seam
//!
//! The wallet lives outside this crate (in a browser it is the Google Pay
//! JavaScript client). Callers inject it through [`PaymentsClientFactory`], which
//! is what lets the checkout flow run against a scripted wallet in tests.

use crate::types::{
    Environment, IsReadyToPayRequest, IsReadyToPayResponse, PaymentData, PaymentDataRequest,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Status code the wallet reports when the user closes the payment sheet
pub const STATUS_CANCELED: &str = "CANCELED";

/// Error object returned by the wallet when a call is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status_code}: {status_message}")]
pub struct WalletError {
    /// Machine-readable code, e.g. `CANCELED` or `DEVELOPER_ERROR`
    pub status_code: String,
    pub status_message: String,
}

impl WalletError {
    pub fn new(status_code: impl Into<String>, status_message: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            status_message: status_message.into(),
        }
    }

    /// The user dismissed the payment sheet
    pub fn canceled() -> Self {
        Self::new(STATUS_CANCELED, "User closed the Payment Request UI.")
    }

    pub fn is_canceled(&self) -> bool {
        self.status_code == STATUS_CANCELED
    }
}

/// Client for the wallet's two asynchronous operations
#[async_trait]
pub trait PaymentsClient: Send + Sync {
    /// Ask whether this device and account can pay with the given methods
    async fn is_ready_to_pay(
        &self,
        request: &IsReadyToPayRequest,
    ) -> Result<IsReadyToPayResponse, WalletError>;

    /// Present the payment sheet and return the tokenized card once the user confirms
    async fn load_payment_data(
        &self,
        request: &PaymentDataRequest,
    ) -> Result<PaymentData, WalletError>;
}

/// Payments client handle shared between pay button setup and payment processing
pub type SharedPaymentsClient = Arc<dyn PaymentsClient>;

/// Creates payments clients for an environment
pub trait PaymentsClientFactory: Send + Sync {
    fn create(&self, environment: Environment) -> SharedPaymentsClient;
}

impl<F> PaymentsClientFactory for F
where
    F: Fn(Environment) -> SharedPaymentsClient + Send + Sync,
{
    fn create(&self, environment: Environment) -> SharedPaymentsClient {
        self(environment)
    }
}
