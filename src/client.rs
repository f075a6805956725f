//! Checkout orchestration: pay button setup and payment processing

use crate::backend::{BackendClient, BackendConfig};
use crate::error::ValidationError;
use crate::types::PaymentOptions;
use crate::validation::{validate, CheckKind, ValidatedOptions};
use crate::wallet::{PaymentsClientFactory, SharedPaymentsClient};
use crate::{GPayError, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Success or failure notification
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Receives the payments client created during pay button setup
pub type ClientSetter = Arc<dyn Fn(SharedPaymentsClient) + Send + Sync>;

/// Caller-supplied notifications.
///
/// `success` and `fail` are required for both operations; `set_payment_client`
/// only for pay button setup. Missing ones are reported by validation.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub success: Option<Callback>,
    pub fail: Option<Callback>,
    pub set_payment_client: Option<ClientSetter>,
}

impl Callbacks {
    pub fn new<S, F>(success: S, fail: F) -> Self
    where
        S: Fn() + Send + Sync + 'static,
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            success: Some(Arc::new(success)),
            fail: Some(Arc::new(fail)),
            set_payment_client: None,
        }
    }

    pub fn with_set_payment_client<C>(mut self, setter: C) -> Self
    where
        C: Fn(SharedPaymentsClient) + Send + Sync + 'static,
    {
        self.set_payment_client = Some(Arc::new(setter));
        self
    }

    fn notify_success(&self) {
        if let Some(success) = &self.success {
            success();
        }
    }

    fn notify_fail(&self) {
        if let Some(fail) = &self.fail {
            fail();
        }
    }

    fn hand_over(&self, client: SharedPaymentsClient) {
        if let Some(setter) = &self.set_payment_client {
            setter(client);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("success", &self.success.as_ref().map(|_| "<function>"))
            .field("fail", &self.fail.as_ref().map(|_| "<function>"))
            .field(
                "set_payment_client",
                &self.set_payment_client.as_ref().map(|_| "<function>"),
            )
            .finish()
    }
}

/// Result of pay button setup
#[derive(Debug)]
pub enum ButtonOutcome {
    /// Validation failed; nothing was created and no callback ran
    Rejected(ValidationError),
    /// The wallet can pay; `success` was called
    Ready,
    /// The wallet cannot pay on this device; `fail` was called
    NotReady,
    /// The readiness check was rejected; `fail` was called
    Failed(GPayError),
}

impl ButtonOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ButtonOutcome::Ready)
    }
}

/// Result of payment processing
#[derive(Debug)]
pub enum PaymentOutcome {
    /// Validation failed; no network call and no callback
    Rejected(ValidationError),
    /// Backend accepted the token; `success` was called
    Completed,
    /// Backend declined or could not be reached; `fail` was called
    Failed(GPayError),
    /// The wallet step was rejected or returned an unreadable token; no callback,
    /// the wallet shows its own error to the user
    Abandoned(GPayError),
}

impl PaymentOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PaymentOutcome::Completed)
    }

    /// Whether the call got past validation
    pub fn passed_validation(&self) -> bool {
        !matches!(self, PaymentOutcome::Rejected(_))
    }
}

/// Entry point for pay button setup and payment processing.
///
/// Holds the wallet factory and the backend HTTP client; it keeps no state
/// between calls. The payments client created by [`Checkout::setup_pay_button`]
/// is handed to the caller through `set_payment_client` and has to be put back
/// into the options for [`Checkout::process_payment`].
#[derive(Clone)]
pub struct Checkout {
    factory: Arc<dyn PaymentsClientFactory>,
    backend: BackendClient,
}

impl fmt::Debug for Checkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("factory", &"<factory>")
            .field("backend", &self.backend)
            .finish()
    }
}

impl Checkout {
    /// Create a checkout with a default backend client
    pub fn new(factory: impl PaymentsClientFactory + 'static) -> Result<Self> {
        Ok(Self::with_backend(factory, BackendClient::new(BackendConfig::default())?))
    }

    /// Create a checkout with a custom backend client
    pub fn with_backend(
        factory: impl PaymentsClientFactory + 'static,
        backend: BackendClient,
    ) -> Self {
        Self {
            factory: Arc::new(factory),
            backend,
        }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Create a payments client, hand it to the caller and check readiness.
    ///
    /// `set_payment_client` runs before the readiness result is known; exactly
    /// one of `success`/`fail` runs afterwards.
    pub async fn setup_pay_button(
        &self,
        options: Option<&PaymentOptions>,
        callbacks: Option<&Callbacks>,
    ) -> ButtonOutcome {
        let options = match validate(CheckKind::ButtonSetup, options, callbacks) {
            Ok(options) => options,
            Err(error) => return ButtonOutcome::Rejected(error),
        };
        let callbacks = options.callbacks();

        let environment = options.environment.unwrap_or_default();
        let client = self.factory.create(environment);
        callbacks.hand_over(client.clone());

        let request = options.is_ready_to_pay_request();
        match client.is_ready_to_pay(&request).await {
            Ok(response) if response.result => {
                info!(%environment, "Wallet is ready to pay");
                callbacks.notify_success();
                ButtonOutcome::Ready
            }
            Ok(_) => {
                warn!(%environment, "Wallet is not ready to pay, pay button stays hidden");
                callbacks.notify_fail();
                ButtonOutcome::NotReady
            }
            Err(error) => {
                warn!(%environment, status_code = %error.status_code, "Readiness check failed: {}", error);
                callbacks.notify_fail();
                ButtonOutcome::Failed(error.into())
            }
        }
    }

    /// Pay button setup reduced to "can the button be shown"
    pub async fn show_pay_button(
        &self,
        options: Option<&PaymentOptions>,
        callbacks: Option<&Callbacks>,
    ) -> bool {
        self.setup_pay_button(options, callbacks).await.is_ready()
    }

    /// Collect a token from the wallet and hand it to the backend.
    pub async fn process_payment(
        &self,
        options: Option<&PaymentOptions>,
        callbacks: Option<&Callbacks>,
    ) -> PaymentOutcome {
        match validate(CheckKind::Processing, options, callbacks) {
            Ok(options) => self.run_payment(options).await,
            Err(error) => PaymentOutcome::Rejected(error),
        }
    }

    /// Validate now, process in the background.
    ///
    /// Returns `false` when validation fails or no tokio runtime is running;
    /// otherwise the payment runs on a spawned task and its result reaches the
    /// caller only through the callbacks.
    pub fn spawn_payment(
        &self,
        options: Option<&PaymentOptions>,
        callbacks: Option<&Callbacks>,
    ) -> bool {
        let options = match validate(CheckKind::Processing, options, callbacks) {
            Ok(options) => options,
            Err(_) => return false,
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(error) => {
                warn!(kind = %CheckKind::Processing, "Cannot start payment: {}", error);
                return false;
            }
        };

        let checkout = self.clone();
        runtime.spawn(async move {
            checkout.run_payment(options).await;
        });
        true
    }

    async fn run_payment(&self, options: ValidatedOptions) -> PaymentOutcome {
        let Some(client) = options.payments_client.clone() else {
            return PaymentOutcome::Rejected(ValidationError::MissingPaymentsClient(options.kind()));
        };
        let callbacks = options.callbacks();

        let request = options.payment_data_request();
        // TODO: route wallet rejections other than CANCELED to `fail`; today they
        // are only logged and rely on the wallet's own error screen.
        let payment_data = match client.load_payment_data(&request).await {
            Ok(payment_data) => payment_data,
            Err(error) => {
                if error.is_canceled() {
                    info!("Payment sheet closed by the user");
                } else {
                    warn!(status_code = %error.status_code, "Wallet rejected payment data request: {}", error);
                }
                return PaymentOutcome::Abandoned(error.into());
            }
        };

        let google_token = match payment_data.parse_token() {
            Ok(token) => token,
            Err(error) => {
                warn!("Wallet returned an unreadable payment token: {}", error);
                return PaymentOutcome::Abandoned(error);
            }
        };

        match self.backend.submit_token(&options, google_token).await {
            Ok(()) => {
                info!(form_request_id = ?options.form_request_id, "Payment accepted by backend");
                callbacks.notify_success();
                PaymentOutcome::Completed
            }
            Err(error) => {
                warn!(form_request_id = ?options.form_request_id, "Payment request failed: {}", error);
                callbacks.notify_fail();
                PaymentOutcome::Failed(error)
            }
        }
    }
}
