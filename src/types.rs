//! Core types for the Google Pay checkout flow

use crate::wallet::SharedPaymentsClient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Google Pay API major version sent with every request
pub const API_VERSION: u32 = 2;

/// Google Pay API minor version sent with every request
pub const API_VERSION_MINOR: u32 = 0;

/// Currency used when the options carry none
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Tokenization type for merchants decrypting the payload themselves
pub const TOKENIZATION_TYPE_DIRECT: &str = "DIRECT";

/// Payload encryption protocol for direct tokenization
pub const PROTOCOL_VERSION: &str = "ECv1";

/// Price status for a fixed, final amount
pub const TOTAL_PRICE_STATUS_FINAL: &str = "FINAL";

/// Authentication methods accepted for cards
pub mod auth_methods {
    pub const PAN_ONLY: &str = "PAN_ONLY";
    pub const CRYPTOGRAM_3DS: &str = "CRYPTOGRAM_3DS";

    /// Methods accepted by the default card descriptor
    pub const DEFAULT: [&str; 2] = [PAN_ONLY, CRYPTOGRAM_3DS];
}

/// Card networks accepted for payment
pub mod card_networks {
    pub const AMEX: &str = "AMEX";
    pub const DISCOVER: &str = "DISCOVER";
    pub const JCB: &str = "JCB";
    pub const MASTERCARD: &str = "MASTERCARD";
    pub const VISA: &str = "VISA";

    /// Networks accepted by the default card descriptor
    pub const DEFAULT: [&str; 5] = [AMEX, DISCOVER, JCB, MASTERCARD, VISA];

    /// Check if a network name is one the wallet knows
    pub fn is_supported(network: &str) -> bool {
        DEFAULT.contains(&network)
    }
}

/// Wallet environment the payments client talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Environment {
    /// Sandbox; returns dummy tokens
    Test,
    /// Live environment
    #[default]
    Production,
}

impl Environment {
    /// Get the environment identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "TEST",
            Environment::Production => "PRODUCTION",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write a JSON number the way the merchant page stringifies it: floats with
/// no fractional part lose the trailing `.0`.
fn write_number(f: &mut fmt::Formatter<'_>, number: &Number) -> fmt::Result {
    match number.as_f64() {
        Some(float) if number.is_f64() => write!(f, "{}", float),
        _ => write!(f, "{}", number),
    }
}

/// Payment amount as supplied by the merchant page: either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(Number),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(number) => write_number(f, number),
            Amount::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::Number(value.into())
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Number(value.into())
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

/// Order or session identifier passed through to the backend in the shape the
/// template rendered it (number or string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrelationId {
    Number(Number),
    Text(String),
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationId::Number(number) => write_number(f, number),
            CorrelationId::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for CorrelationId {
    fn from(value: u64) -> Self {
        CorrelationId::Number(value.into())
    }
}

impl From<i64> for CorrelationId {
    fn from(value: i64) -> Self {
        CorrelationId::Number(value.into())
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        CorrelationId::Text(value.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        CorrelationId::Text(value)
    }
}

/// Card parameters of a payment method descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardParameters {
    #[serde(rename = "allowedAuthMethods")]
    pub allowed_auth_methods: Vec<String>,
    #[serde(rename = "allowedCardNetworks")]
    pub allowed_card_networks: Vec<String>,
    /// Any further card parameters (billing address, prepaid cards, ...) passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payment method the merchant accepts, without tokenization details.
///
/// Sent as-is with the readiness check and merged with a
/// [`TokenizationSpecification`] for the payment data request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePaymentMethod {
    #[serde(rename = "type")]
    pub method_type: String,
    pub parameters: CardParameters,
}

impl BasePaymentMethod {
    /// Card descriptor accepting the given auth methods and networks
    pub fn card<A, N>(auth_methods: A, card_networks: N) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            method_type: "CARD".to_string(),
            parameters: CardParameters {
                allowed_auth_methods: auth_methods.into_iter().map(Into::into).collect(),
                allowed_card_networks: card_networks.into_iter().map(Into::into).collect(),
                extra: Map::new(),
            },
        }
    }
}

impl Default for BasePaymentMethod {
    fn default() -> Self {
        Self::card(auth_methods::DEFAULT, card_networks::DEFAULT)
    }
}

/// How the wallet should hand the card data back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizationSpecification {
    #[serde(rename = "type")]
    pub tokenization_type: String,
    pub parameters: TokenizationParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizationParameters {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

impl TokenizationSpecification {
    /// Direct tokenization encrypted for the merchant's public key
    pub fn direct(public_key: impl Into<String>) -> Self {
        Self {
            tokenization_type: TOKENIZATION_TYPE_DIRECT.to_string(),
            parameters: TokenizationParameters {
                protocol_version: PROTOCOL_VERSION.to_string(),
                public_key: public_key.into(),
            },
        }
    }
}

/// Base payment method merged with its tokenization specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPaymentMethod {
    #[serde(flatten)]
    pub base: BasePaymentMethod,
    #[serde(rename = "tokenizationSpecification")]
    pub tokenization_specification: TokenizationSpecification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantInfo {
    #[serde(rename = "merchantId", skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(rename = "merchantName", skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInfo {
    #[serde(rename = "currencyCode")]
    pub currency_code: String,
    #[serde(rename = "totalPriceStatus")]
    pub total_price_status: String,
    /// Always a string, whatever shape the amount came in
    #[serde(rename = "totalPrice")]
    pub total_price: String,
}

/// Request for the wallet's payment sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDataRequest {
    #[serde(rename = "apiVersion")]
    pub api_version: u32,
    #[serde(rename = "apiVersionMinor")]
    pub api_version_minor: u32,
    #[serde(rename = "allowedPaymentMethods")]
    pub allowed_payment_methods: Vec<CardPaymentMethod>,
    #[serde(rename = "merchantInfo")]
    pub merchant_info: MerchantInfo,
    #[serde(rename = "transactionInfo")]
    pub transaction_info: TransactionInfo,
}

/// Readiness check sent before the pay button is shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsReadyToPayRequest {
    #[serde(rename = "apiVersion")]
    pub api_version: u32,
    #[serde(rename = "apiVersionMinor")]
    pub api_version_minor: u32,
    #[serde(rename = "allowedPaymentMethods")]
    pub allowed_payment_methods: Vec<BasePaymentMethod>,
}

impl IsReadyToPayRequest {
    pub fn new(base_payment_method: BasePaymentMethod) -> Self {
        Self {
            api_version: API_VERSION,
            api_version_minor: API_VERSION_MINOR,
            allowed_payment_methods: vec![base_payment_method],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsReadyToPayResponse {
    pub result: bool,
}

/// What the wallet returns once the user confirmed the payment sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    #[serde(rename = "paymentMethodData")]
    pub payment_method_data: PaymentMethodData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodData {
    #[serde(rename = "tokenizationData")]
    pub tokenization_data: TokenizationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizationData {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tokenization_type: Option<String>,
    /// Encrypted payment token, itself serialized JSON
    pub token: String,
}

impl PaymentData {
    /// Parse the token payload embedded as text in the response
    pub fn parse_token(&self) -> crate::Result<Value> {
        Ok(serde_json::from_str(
            &self.payment_method_data.tokenization_data.token,
        )?)
    }
}

/// Options for the pay button and the payment itself.
///
/// Field names follow the JSON the merchant page template renders, so a
/// template blob deserializes directly. The payments client handle cannot
/// come from JSON and is attached with [`PaymentOptions::with_payments_client`].
#[derive(Clone, Default, Deserialize)]
pub struct PaymentOptions {
    /// Merchant public key for direct tokenization
    #[serde(rename = "googlePayPublicKey", default)]
    pub public_key: Option<String>,
    #[serde(rename = "googleBaseCardPaymentMethod", default)]
    pub base_payment_method: Option<BasePaymentMethod>,
    #[serde(rename = "merc_id", default)]
    pub merchant_id: Option<String>,
    #[serde(rename = "merc_name", default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(rename = "sum", default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub environment: Option<Environment>,
    #[serde(skip)]
    pub payments_client: Option<SharedPaymentsClient>,
    #[serde(default)]
    pub request_url: Option<String>,
    #[serde(default)]
    pub form_request_id: Option<CorrelationId>,
    #[serde(default)]
    pub link_id: Option<CorrelationId>,
    #[serde(default)]
    pub refill_id: Option<CorrelationId>,
    #[serde(rename = "apikey", default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub client_id: Option<CorrelationId>,
}

impl fmt::Debug for PaymentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentOptions")
            .field("public_key", &self.public_key)
            .field("base_payment_method", &self.base_payment_method)
            .field("merchant_id", &self.merchant_id)
            .field("merchant_name", &self.merchant_name)
            .field("currency", &self.currency)
            .field("amount", &self.amount)
            .field("environment", &self.environment)
            .field(
                "payments_client",
                &self.payments_client.as_ref().map(|_| "<client>"),
            )
            .field("request_url", &self.request_url)
            .field("form_request_id", &self.form_request_id)
            .field("link_id", &self.link_id)
            .field("refill_id", &self.refill_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl PaymentOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    pub fn with_base_payment_method(mut self, method: BasePaymentMethod) -> Self {
        self.base_payment_method = Some(method);
        self
    }

    /// Set merchant id and display name
    pub fn with_merchant(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.merchant_id = Some(id.into());
        self.merchant_name = Some(name.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<Amount>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Attach the client created during pay button setup
    pub fn with_payments_client(mut self, client: SharedPaymentsClient) -> Self {
        self.payments_client = Some(client);
        self
    }

    /// Set the backend endpoint and the form request it belongs to
    pub fn with_request(
        mut self,
        request_url: impl Into<String>,
        form_request_id: impl Into<CorrelationId>,
    ) -> Self {
        self.request_url = Some(request_url.into());
        self.form_request_id = Some(form_request_id.into());
        self
    }

    pub fn with_link_id(mut self, link_id: impl Into<CorrelationId>) -> Self {
        self.link_id = Some(link_id.into());
        self
    }

    pub fn with_refill_id(mut self, refill_id: impl Into<CorrelationId>) -> Self {
        self.refill_id = Some(refill_id.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<CorrelationId>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Build the payment data request for the wallet's payment sheet
    pub fn payment_data_request(&self) -> PaymentDataRequest {
        let tokenization =
            TokenizationSpecification::direct(self.public_key.clone().unwrap_or_default());
        let card_payment_method = CardPaymentMethod {
            base: self.base_payment_method.clone().unwrap_or_default(),
            tokenization_specification: tokenization,
        };

        PaymentDataRequest {
            api_version: API_VERSION,
            api_version_minor: API_VERSION_MINOR,
            allowed_payment_methods: vec![card_payment_method],
            merchant_info: MerchantInfo {
                merchant_id: self.merchant_id.clone(),
                merchant_name: self.merchant_name.clone(),
            },
            transaction_info: TransactionInfo {
                currency_code: self
                    .currency
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                total_price_status: TOTAL_PRICE_STATUS_FINAL.to_string(),
                total_price: self
                    .amount
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            },
        }
    }

    /// Build the readiness check for the pay button
    pub fn is_ready_to_pay_request(&self) -> IsReadyToPayRequest {
        IsReadyToPayRequest::new(self.base_payment_method.clone().unwrap_or_default())
    }

    /// Build the backend body carrying the parsed token
    pub fn token_submission(&self, google_token: Value) -> TokenSubmission<'_> {
        TokenSubmission {
            google_token,
            pub_key: self.public_key.as_deref(),
            link_id: self.link_id.as_ref(),
            sum: self.amount.as_ref(),
            refill_id: self.refill_id.as_ref(),
            apikey: self.api_key.as_deref(),
            client_id: self.client_id.as_ref(),
        }
    }
}

/// Body posted to the merchant backend
#[derive(Debug, Clone, Serialize)]
pub struct TokenSubmission<'a> {
    #[serde(rename = "googleToken")]
    pub google_token: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_id: Option<&'a CorrelationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<&'a Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refill_id: Option<&'a CorrelationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<&'a CorrelationId>,
}

/// Backend result code that marks a successful payment
pub const BACKEND_SUCCESS_CODE: &str = "0";

/// Merchant backend reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    #[serde(default)]
    pub code: Option<Value>,
}

impl BackendResponse {
    /// Whether the code equals the success sentinel (`"0"`, or the number `0`)
    pub fn is_success(&self) -> bool {
        match &self.code {
            Some(Value::String(code)) => code == BACKEND_SUCCESS_CODE,
            Some(Value::Number(code)) => code.as_u64() == Some(0),
            _ => false,
        }
    }

    /// Code as text, for logs and errors
    pub fn code_str(&self) -> String {
        match &self.code {
            Some(Value::String(code)) => code.clone(),
            Some(other) => other.to_string(),
            None => "<none>".to_string(),
        }
    }
}
