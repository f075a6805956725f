#![allow(dead_code)]

use async_trait::async_trait;
use gpay_checkout::{
    Callbacks, IsReadyToPayRequest, IsReadyToPayResponse, PaymentData,
    PaymentDataRequest, PaymentMethodData, PaymentsClient, SharedPaymentsClient,
    TokenizationData, WalletError,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Shared, ordered log of callback and wallet events
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Wallet double answering from a script
pub struct ScriptedWallet {
    ready: Result<bool, WalletError>,
    payment: Result<PaymentData, WalletError>,
    log: EventLog,
    pub payment_requests: Mutex<Vec<PaymentDataRequest>>,
    pub ready_requests: Mutex<Vec<IsReadyToPayRequest>>,
}

impl ScriptedWallet {
    pub fn new(log: EventLog) -> Self {
        Self {
            ready: Ok(true),
            payment: Err(WalletError::canceled()),
            log,
            payment_requests: Mutex::new(Vec::new()),
            ready_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn ready(mut self, ready: Result<bool, WalletError>) -> Self {
        self.ready = ready;
        self
    }

    pub fn paying_with(mut self, payment: Result<PaymentData, WalletError>) -> Self {
        self.payment = payment;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn last_payment_request(&self) -> Option<PaymentDataRequest> {
        self.payment_requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentsClient for ScriptedWallet {
    async fn is_ready_to_pay(
        &self,
        request: &IsReadyToPayRequest,
    ) -> Result<IsReadyToPayResponse, WalletError> {
        self.log.lock().unwrap().push("is_ready_to_pay".to_string());
        self.ready_requests.lock().unwrap().push(request.clone());
        self.ready.clone().map(|result| IsReadyToPayResponse { result })
    }

    async fn load_payment_data(
        &self,
        request: &PaymentDataRequest,
    ) -> Result<PaymentData, WalletError> {
        self.log.lock().unwrap().push("load_payment_data".to_string());
        self.payment_requests.lock().unwrap().push(request.clone());
        self.payment.clone()
    }
}

/// Wallet response carrying `token` as the serialized tokenization payload
pub fn payment_data(token: &Value) -> PaymentData {
    raw_payment_data(token.to_string())
}

pub fn raw_payment_data(token: impl Into<String>) -> PaymentData {
    PaymentData {
        payment_method_data: PaymentMethodData {
            tokenization_data: TokenizationData {
                tokenization_type: Some("DIRECT".to_string()),
                token: token.into(),
            },
        },
    }
}

/// Records every callback invocation into an event log
#[derive(Clone, Default)]
pub struct Recorder {
    pub log: EventLog,
    pub client: Arc<Mutex<Option<SharedPaymentsClient>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callbacks(&self) -> Callbacks {
        let (success_log, fail_log, setter_log) =
            (self.log.clone(), self.log.clone(), self.log.clone());
        let slot = self.client.clone();

        Callbacks::new(
            move || success_log.lock().unwrap().push("success".to_string()),
            move || fail_log.lock().unwrap().push("fail".to_string()),
        )
        .with_set_payment_client(move |client| {
            setter_log
                .lock()
                .unwrap()
                .push("set_payment_client".to_string());
            *slot.lock().unwrap() = Some(client);
        })
    }

    pub fn events(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    pub fn stored_client(&self) -> Option<SharedPaymentsClient> {
        self.client.lock().unwrap().clone()
    }
}
