//! Example checkout against a local merchant backend
//!
//! Uses a wallet stand-in that behaves like the TEST environment: it is always
//! ready and returns a dummy token. Point `GPAY_REQUEST_URL` at the backend.

use async_trait::async_trait;
use gpay_checkout::{
    Callbacks, Checkout, Environment, IsReadyToPayRequest, IsReadyToPayResponse, PaymentData,
    PaymentDataRequest, PaymentMethodData, PaymentOptions, PaymentsClient, SharedPaymentsClient,
    TokenizationData, WalletError,
};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

struct TestWallet;

#[async_trait]
impl PaymentsClient for TestWallet {
    async fn is_ready_to_pay(
        &self,
        _request: &IsReadyToPayRequest,
    ) -> Result<IsReadyToPayResponse, WalletError> {
        Ok(IsReadyToPayResponse { result: true })
    }

    async fn load_payment_data(
        &self,
        request: &PaymentDataRequest,
    ) -> Result<PaymentData, WalletError> {
        println!(
            "Payment sheet: {} {}",
            request.transaction_info.total_price, request.transaction_info.currency_code
        );
        Ok(PaymentData {
            payment_method_data: PaymentMethodData {
                tokenization_data: TokenizationData {
                    tokenization_type: Some("DIRECT".to_string()),
                    token: r#"{"protocolVersion":"ECv1","signature":"dummy","signedMessage":"{}"}"#
                        .to_string(),
                },
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let request_url = std::env::var("GPAY_REQUEST_URL")
        .unwrap_or_else(|_| "http://localhost:8080/gpay".to_string());

    let checkout = Checkout::new(|_: Environment| Arc::new(TestWallet) as SharedPaymentsClient)?;

    let stored: Arc<Mutex<Option<SharedPaymentsClient>>> = Arc::new(Mutex::new(None));
    let slot = stored.clone();
    let button_callbacks = Callbacks::new(
        || println!("Pay button shown"),
        || println!("Pay button unavailable"),
    )
    .with_set_payment_client(move |client| {
        if let Ok(mut slot) = slot.lock() {
            *slot = Some(client);
        }
    });

    let setup = PaymentOptions::new().with_environment(Environment::Test);
    if !checkout
        .show_pay_button(Some(&setup), Some(&button_callbacks))
        .await
    {
        return Ok(());
    }

    let client = stored.lock().ok().and_then(|slot| slot.clone());
    let Some(client) = client else {
        return Ok(());
    };

    let options = PaymentOptions::new()
        .with_public_key("BDemoPublicKey")
        .with_merchant("12345678901234567890", "JOHN SMITH")
        .with_amount(500u64)
        .with_request(request_url, "demo-form")
        .with_payments_client(client);
    let payment_callbacks = Callbacks::new(
        || println!("Payment accepted"),
        || println!("Payment failed"),
    );

    let outcome = checkout
        .process_payment(Some(&options), Some(&payment_callbacks))
        .await;
    println!("Outcome: {:?}", outcome);

    Ok(())
}
