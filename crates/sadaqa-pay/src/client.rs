//! HTTP client for the payment processor API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::instrument;

use sadaqa_common::config::GatewayConfig;
use sadaqa_core::traits::{
    CreateCustomer, CreatePaymentIntent, CreateRecurringPrice, CreateSubscription, CustomerHandle,
    GatewayError, GatewayEvent, GatewayResult, PaymentGateway, PaymentIntentHandle, PriceHandle,
    SubscriptionHandle,
};

use crate::events::parse_event;
use crate::signature::WebhookVerifier;

/// HTTP implementation of the PaymentGateway port
///
/// Speaks the processor's form-encoded REST dialect. Requests that charge
/// money carry an `Idempotency-Key` header, so a retried request lands on
/// the first attempt instead of charging twice.
pub struct HttpPaymentGateway {
    client: Client,
    base_url: String,
    secret_key: String,
    verifier: WebhookVerifier,
}

impl HttpPaymentGateway {
    /// Build the client from gateway configuration
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            verifier: WebhookVerifier::new(&config.webhook_secret),
        })
    }

    async fn post_form<T>(
        &self,
        path: &str,
        params: &[(&str, String)],
        idempotency_key: Option<&str>,
    ) -> GatewayResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(params);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_api_error(status, &body));
        }

        response.json::<T>().await.map_err(|e| GatewayError::Api {
            code: None,
            message: format!("malformed response body: {e}"),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[instrument(skip(self, request))]
    async fn create_customer(&self, request: CreateCustomer) -> GatewayResult<CustomerHandle> {
        let mut params = vec![("email", request.email)];
        if let Some(name) = request.name {
            params.push(("name", name));
        }

        let customer: CustomerResponse = self.post_form("/v1/customers", &params, None).await?;
        Ok(CustomerHandle {
            customer_ref: customer.id,
        })
    }

    #[instrument(skip(self, request))]
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> GatewayResult<PaymentIntentHandle> {
        let mut params = vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency),
            ("customer", request.customer_ref),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];
        if let Some(description) = request.description {
            params.push(("description", description));
        }

        let intent: PaymentIntentResponse = self
            .post_form(
                "/v1/payment_intents",
                &params,
                Some(&request.idempotency_key),
            )
            .await?;
        let client_secret = intent.client_secret.ok_or_else(|| GatewayError::Api {
            code: None,
            message: "payment intent missing client_secret".to_string(),
        })?;

        Ok(PaymentIntentHandle {
            intent_ref: intent.id,
            client_secret,
        })
    }

    #[instrument(skip(self, request))]
    async fn create_recurring_price(
        &self,
        request: CreateRecurringPrice,
    ) -> GatewayResult<PriceHandle> {
        let params = vec![
            ("unit_amount", request.amount.to_string()),
            ("currency", request.currency),
            (
                "recurring[interval]",
                request.interval.unit.as_str().to_string(),
            ),
            (
                "recurring[interval_count]",
                request.interval.count.to_string(),
            ),
            ("product_data[name]", request.product_name),
        ];

        let price: PriceResponse = self.post_form("/v1/prices", &params, None).await?;
        Ok(PriceHandle {
            price_ref: price.id,
        })
    }

    #[instrument(skip(self, request))]
    async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> GatewayResult<SubscriptionHandle> {
        // default_incomplete leaves the first invoice open until the browser
        // confirms its payment intent with the returned client secret.
        let params = vec![
            ("customer", request.customer_ref),
            ("items[0][price]", request.price_ref),
            ("payment_behavior", "default_incomplete".to_string()),
            ("expand[]", "latest_invoice.payment_intent".to_string()),
        ];

        let subscription: SubscriptionResponse = self
            .post_form(
                "/v1/subscriptions",
                &params,
                Some(&request.idempotency_key),
            )
            .await?;

        let intent = subscription
            .latest_invoice
            .and_then(|invoice| invoice.payment_intent);
        let (intent_ref, client_secret) = match intent {
            Some(intent) => (Some(intent.id), intent.client_secret),
            None => (None, None),
        };

        Ok(SubscriptionHandle {
            subscription_ref: subscription.id,
            intent_ref,
            client_secret,
        })
    }

    fn verify_event(&self, payload: &[u8], signature_header: &str) -> GatewayResult<GatewayEvent> {
        self.verifier.verify(payload, signature_header)?;
        parse_event(payload)
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Connection(e.to_string())
    }
}

// ============================================================================
// Response payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct CustomerResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SubscriptionResponse {
    id: String,
    latest_invoice: Option<InvoiceResponse>,
}

#[derive(Debug, Deserialize)]
struct InvoiceResponse {
    payment_intent: Option<PaymentIntentResponse>,
}

/// Error envelope the processor returns on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> GatewayError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => GatewayError::Api {
            code: envelope.error.code,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| format!("HTTP {status}")),
        },
        Err(_) => GatewayError::Api {
            code: None,
            message: format!("HTTP {status}"),
        },
    }
}
