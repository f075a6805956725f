//! Parameter validation shared by pay button setup and payment processing
//!
//! Validation runs before any wallet or network call. It never touches the
//! caller's options: defaults are applied to a copy returned inside
//! [`ValidatedOptions`], and applying them again changes nothing.

use crate::client::Callbacks;
use crate::error::ValidationError;
use crate::types::{BasePaymentMethod, Environment, PaymentOptions, DEFAULT_CURRENCY};
use std::fmt;
use std::ops::Deref;
use tracing::warn;

/// Which operation is asking for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Payment processing; needs a payments client
    Processing,
    /// Pay button setup; needs a `setPaymentClient` callback
    ButtonSetup,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Processing => "processing",
            CheckKind::ButtonSetup => "button-setup",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options that passed validation, with defaults filled in, plus the
/// callbacks they were checked against
#[derive(Debug, Clone)]
pub struct ValidatedOptions {
    kind: CheckKind,
    options: PaymentOptions,
    callbacks: Callbacks,
}

impl ValidatedOptions {
    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    pub fn into_inner(self) -> PaymentOptions {
        self.options
    }
}

impl Deref for ValidatedOptions {
    type Target = PaymentOptions;

    fn deref(&self) -> &Self::Target {
        &self.options
    }
}

/// Validate options and callbacks for `kind`.
///
/// Fails on the first missing piece, in this order: options, callbacks,
/// `fail`, `success`, then the payments client (processing) or the
/// `setPaymentClient` callback (button setup). Each rejection is logged with
/// the failing field and the operation kind.
pub fn validate(
    kind: CheckKind,
    options: Option<&PaymentOptions>,
    callbacks: Option<&Callbacks>,
) -> Result<ValidatedOptions, ValidationError> {
    check(kind, options, callbacks).map_err(|error| {
        warn!(kind = %kind, field = error.field(), "{}", error);
        error
    })
}

fn check(
    kind: CheckKind,
    options: Option<&PaymentOptions>,
    callbacks: Option<&Callbacks>,
) -> Result<ValidatedOptions, ValidationError> {
    let options = options.ok_or(ValidationError::MissingOptions(kind))?;
    let callbacks = callbacks.ok_or(ValidationError::MissingCallbacks(kind))?;

    if callbacks.fail.is_none() {
        return Err(ValidationError::MissingFailCallback(kind));
    }
    if callbacks.success.is_none() {
        return Err(ValidationError::MissingSuccessCallback(kind));
    }

    let mut resolved = options.clone();
    if resolved.base_payment_method.is_none() {
        resolved.base_payment_method = Some(BasePaymentMethod::default());
    }

    match kind {
        CheckKind::Processing => {
            // created during button setup and handed back by the caller
            if resolved.payments_client.is_none() {
                return Err(ValidationError::MissingPaymentsClient(kind));
            }
            if resolved.currency.is_none() {
                resolved.currency = Some(DEFAULT_CURRENCY.to_string());
            }
        }
        CheckKind::ButtonSetup => {
            if resolved.environment.is_none() {
                resolved.environment = Some(Environment::Production);
            }
            if callbacks.set_payment_client.is_none() {
                return Err(ValidationError::MissingClientSetter(kind));
            }
        }
    }

    Ok(ValidatedOptions {
        kind,
        options: resolved,
        callbacks: callbacks.clone(),
    })
}
