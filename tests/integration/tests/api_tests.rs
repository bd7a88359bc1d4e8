//! API Integration Tests
//!
//! End-to-end tests over the real HTTP application with in-memory
//! infrastructure. No external services are required; webhook deliveries
//! are signed with the processor's scheme against the shared test secret.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, fixtures::*, sign_webhook, TestServer,
};
use reqwest::StatusCode;
use sadaqa_core::value_objects::{Frequency, IntervalUnit, SubscriptionStatus};
use sadaqa_pay::WebhookVerifier;
use uuid::Uuid;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_reports_database_down() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    // The hermetic suite points the pool at a closed port on purpose.
    assert_status(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
}

// ============================================================================
// Donation Intake Tests
// ============================================================================

#[tokio::test]
async fn test_create_one_time_donation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(1_500).with_fee(10.0);

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    let created: PaymentCreatedBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(created.success);
    assert_eq!(created.payment_type, "payment_intent");
    assert!(created.client_secret.is_some());
    assert!(!created.reference.is_empty());
    assert_eq!(created.amounts.donation, 1_500);
    assert_eq!(created.amounts.platform_fee, 150);
    assert_eq!(created.amounts.gift_aid, 0);
    assert_eq!(created.amounts.total, 1_650);

    // The processor is asked to charge the full total, once.
    let intents = server.gateway.intents();
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].amount, 1_650);
    assert_eq!(intents[0].currency, "gbp");
    assert_eq!(server.gateway.customers().len(), 1);

    // The row is queryable and still pending settlement.
    let response = server
        .get(&format!("/api/donations/{}", created.donation_id))
        .await
        .unwrap();
    let donation: DonationBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(donation.status, "pending");
    assert_eq!(donation.frequency, "one-time");
    assert_eq!(donation.currency, "gbp");
    assert_eq!(donation.amounts.total, 1_650);
    assert!(donation.completed_at.is_none());
}

#[tokio::test]
async fn test_fee_rates_match_half_up_rounding() {
    let server = TestServer::start().await.expect("Failed to start server");

    // 12.5% of 1500 = 187.5, rounds up to 188.
    for (percent, expected_fee) in [(0.0, 0), (10.0, 150), (12.5, 188), (15.0, 225)] {
        let request = DonationRequest::one_time(1_500).with_fee(percent);
        let response = server
            .post("/api/donations/create-payment", &request)
            .await
            .unwrap();
        let created: PaymentCreatedBody = assert_json(response, StatusCode::OK).await.unwrap();

        assert_eq!(created.amounts.platform_fee, expected_fee, "at {percent}%");
        assert_eq!(created.amounts.total, 1_500 + expected_fee, "at {percent}%");
    }
}

#[tokio::test]
async fn test_gift_aid_reclaim_is_not_charged() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(2_000).with_gift_aid();

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    let created: PaymentCreatedBody = assert_json(response, StatusCode::OK).await.unwrap();

    // 25% reclaim is stored on the row but the payer is charged the gift alone.
    assert_eq!(created.amounts.gift_aid, 500);
    assert_eq!(created.amounts.total, 2_000);
    assert_eq!(server.gateway.intents()[0].amount, 2_000);

    let donation = server
        .donations
        .get(created.donation_id)
        .expect("donation row missing");
    assert!(donation.gift_aid.enabled);
    assert_eq!(donation.gift_aid.amount, 500);
}

#[tokio::test]
async fn test_gift_aid_declaration_sticks_on_donor() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(500).with_gift_aid();
    let email = request.email.clone();

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let donor = server.donors.get_by_email(&email).expect("donor missing");
    assert!(donor.gift_aid_eligible);
    assert!(donor.gift_aid_declared_at.is_some());
}

#[tokio::test]
async fn test_recurring_donation_opens_subscription() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::recurring(2_000, "monthly");

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    let created: PaymentCreatedBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(created.payment_type, "subscription");
    assert!(created.client_secret.is_some());

    // A plan priced at the charged total, labelled from config.
    let prices = server.gateway.prices();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].amount, 2_000);
    assert_eq!(prices[0].product_name, "Recurring donation");
    assert_eq!(prices[0].interval.unit, IntervalUnit::Month);
    assert_eq!(prices[0].interval.count, 1);
    assert_eq!(server.gateway.subscriptions().len(), 1);

    // The local subscription row tracks the plan.
    let subscriptions = server.subscriptions.all();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].status, SubscriptionStatus::Active);
    assert_eq!(subscriptions[0].amount, 2_000);
    assert_eq!(subscriptions[0].frequency, Frequency::Monthly);
    assert!(subscriptions[0].next_payment_at.is_some());
}

#[tokio::test]
async fn test_quarterly_maps_to_three_month_interval() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::recurring(900, "quarterly");

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let prices = server.gateway.prices();
    assert_eq!(prices[0].interval.unit, IntervalUnit::Month);
    assert_eq!(prices[0].interval.count, 3);
}

#[tokio::test]
async fn test_rejects_invalid_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(1_000).with_email("not-an-email");

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "VALIDATION_ERROR");
    assert_eq!(server.donations.count(), 0);
}

#[tokio::test]
async fn test_rejects_zero_amount() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = DonationRequest::one_time(1_000);
    request.amount = 0;

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_rejects_unknown_frequency() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = DonationRequest::one_time(1_000);
    request.frequency = "fortnightly".to_string();

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_FREQUENCY");
}

#[tokio::test]
async fn test_unknown_appeal_rejected_before_charging() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(1_000).with_appeal(Uuid::new_v4());

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.error.code, "NOT_FOUND");

    // Nothing reached the processor and nothing was stored.
    assert!(server.gateway.customers().is_empty());
    assert!(server.gateway.intents().is_empty());
    assert_eq!(server.donations.count(), 0);
}

#[tokio::test]
async fn test_donor_reused_across_donations_by_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let email = format!("repeat{}@example.com", unique_suffix());

    let first = DonationRequest::one_time(1_000).with_email(&email);
    let response = server
        .post("/api/donations/create-payment", &first)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let mut second = DonationRequest::one_time(2_000).with_email(&email);
    second.first_name = Some("Fatima".to_string());
    let response = server
        .post("/api/donations/create-payment", &second)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // One donor row, one processor customer, refreshed contact details.
    assert_eq!(server.donors.count(), 1);
    assert_eq!(server.gateway.customers().len(), 1);
    let donor = server.donors.get_by_email(&email).expect("donor missing");
    assert_eq!(donor.first_name.as_deref(), Some("Fatima"));
    assert_eq!(server.donations.count(), 2);
}

#[tokio::test]
async fn test_concurrent_intake_same_new_email_yields_one_donor() {
    let server = TestServer::start().await.expect("Failed to start server");
    let email = format!("race{}@example.com", unique_suffix());

    let first = DonationRequest::one_time(1_000).with_email(&email);
    let second = DonationRequest::one_time(2_500).with_email(&email);
    let (a, b) = tokio::join!(
        server.post("/api/donations/create-payment", &first),
        server.post("/api/donations/create-payment", &second),
    );

    // Whoever loses the unique-email insert reloads the winner's row, so
    // both intakes succeed against a single donor.
    assert_status(a.unwrap(), StatusCode::OK).await.unwrap();
    assert_status(b.unwrap(), StatusCode::OK).await.unwrap();
    assert_eq!(server.donors.count(), 1);
    assert_eq!(server.donations.count(), 2);
}

#[tokio::test]
async fn test_identical_retries_share_idempotency_key() {
    let server = TestServer::start().await.expect("Failed to start server");
    let email = format!("retry{}@example.com", unique_suffix());

    for _ in 0..2 {
        let request = DonationRequest::one_time(1_500).with_email(&email);
        let response = server
            .post("/api/donations/create-payment", &request)
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let intents = server.gateway.intents();
    assert_eq!(intents.len(), 2);
    assert_eq!(intents[0].idempotency_key, intents[1].idempotency_key);
}

// ============================================================================
// Donation Lookup Tests
// ============================================================================

#[tokio::test]
async fn test_get_donation_invalid_id() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/donations/not-a-uuid").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_get_donation_unknown() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get(&format!("/api/donations/{}", Uuid::new_v4()))
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_get_appeal_unknown() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get(&format!("/api/appeals/{}", Uuid::new_v4()))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Webhook Signature Tests
// ============================================================================

#[tokio::test]
async fn test_webhook_missing_signature_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let body = serde_json::to_vec(&payment_succeeded_event("pi_any")).unwrap();

    let response = server.post_webhook_raw(body, None).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "AUTHENTICITY_ERROR");
}

#[tokio::test]
async fn test_webhook_wrong_secret_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let body = serde_json::to_vec(&payment_succeeded_event("pi_any")).unwrap();
    let forged = WebhookVerifier::new("whsec_someone_else")
        .sign(&body, chrono::Utc::now().timestamp());

    let response = server.post_webhook_raw(body, Some(&forged)).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "AUTHENTICITY_ERROR");
}

#[tokio::test]
async fn test_webhook_stale_timestamp_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let body = serde_json::to_vec(&payment_succeeded_event("pi_any")).unwrap();
    let stale = sign_webhook(&body, chrono::Utc::now().timestamp() - 3_600);

    let response = server.post_webhook_raw(body, Some(&stale)).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_webhook_tampered_body_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let signed_body = serde_json::to_vec(&payment_succeeded_event("pi_original")).unwrap();
    let header = sign_webhook(&signed_body, chrono::Utc::now().timestamp());
    let tampered = serde_json::to_vec(&payment_succeeded_event("pi_swapped")).unwrap();

    let response = server.post_webhook_raw(tampered, Some(&header)).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Webhook Reconciliation Tests
// ============================================================================

/// Intake a donation and return (donation_id, intent_ref)
async fn intake(server: &TestServer, request: &DonationRequest) -> (Uuid, String) {
    let response = server
        .post("/api/donations/create-payment", request)
        .await
        .unwrap();
    let created: PaymentCreatedBody = assert_json(response, StatusCode::OK).await.unwrap();
    let donation = server
        .donations
        .get(created.donation_id)
        .expect("donation row missing");
    let intent_ref = donation.payment.intent_ref.expect("intent ref missing");
    (created.donation_id, intent_ref)
}

#[tokio::test]
async fn test_payment_succeeded_completes_donation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(1_500).with_fee(10.0).with_gift_aid();
    let email = request.email.clone();
    let (donation_id, intent_ref) = intake(&server, &request).await;

    let response = server
        .post_webhook(&payment_succeeded_event(&intent_ref))
        .await
        .unwrap();
    let ack: AckBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(ack.received);

    let response = server
        .get(&format!("/api/donations/{donation_id}"))
        .await
        .unwrap();
    let donation: DonationBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(donation.status, "completed");
    assert!(donation.completed_at.is_some());

    // Lifetime aggregates count the base gift, not the fee.
    let donor = server.donors.get_by_email(&email).expect("donor missing");
    assert_eq!(donor.total_donated, 1_500);
    assert_eq!(donor.donation_count, 1);
    assert!(donor.last_donation_at.is_some());

    // One receipt, carrying the full breakdown.
    let receipts = server.notifier.receipts();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].email, email);
    assert_eq!(receipts[0].amount, 1_500);
    assert_eq!(receipts[0].platform_fee, 150);
    assert_eq!(receipts[0].total, 1_650);
    assert_eq!(receipts[0].gift_aid, 375);
}

#[tokio::test]
async fn test_payment_succeeded_redelivery_counts_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(1_000);
    let email = request.email.clone();
    let (_donation_id, intent_ref) = intake(&server, &request).await;

    let event = payment_succeeded_event(&intent_ref);
    for _ in 0..2 {
        let response = server.post_webhook(&event).await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let donor = server.donors.get_by_email(&email).expect("donor missing");
    assert_eq!(donor.total_donated, 1_000);
    assert_eq!(donor.donation_count, 1);
    assert_eq!(server.notifier.count(), 1);
}

#[tokio::test]
async fn test_payment_failed_records_reason() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(1_000);
    let email = request.email.clone();
    let (donation_id, intent_ref) = intake(&server, &request).await;

    let response = server
        .post_webhook(&payment_failed_event(&intent_ref, "Your card was declined."))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let donation = server.donations.get(donation_id).expect("row missing");
    assert_eq!(donation.status.as_str(), "failed");
    assert_eq!(donation.notes.as_deref(), Some("Your card was declined."));

    // No credit, no receipt.
    let donor = server.donors.get_by_email(&email).expect("donor missing");
    assert_eq!(donor.total_donated, 0);
    assert_eq!(server.notifier.count(), 0);
}

#[tokio::test]
async fn test_failed_donation_not_resurrected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::one_time(1_000);
    let email = request.email.clone();
    let (donation_id, intent_ref) = intake(&server, &request).await;

    let response = server
        .post_webhook(&payment_failed_event(&intent_ref, "insufficient funds"))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // A late success for the same intent is acknowledged but changes nothing.
    let response = server
        .post_webhook(&payment_succeeded_event(&intent_ref))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let donation = server.donations.get(donation_id).expect("row missing");
    assert_eq!(donation.status.as_str(), "failed");
    let donor = server.donors.get_by_email(&email).expect("donor missing");
    assert_eq!(donor.total_donated, 0);
    assert_eq!(server.notifier.count(), 0);
}

#[tokio::test]
async fn test_unknown_intent_acknowledged_without_effect() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post_webhook(&payment_succeeded_event("pi_nobody_knows"))
        .await
        .unwrap();
    let ack: AckBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(ack.received);
    assert_eq!(server.donations.count(), 0);
    assert_eq!(server.notifier.count(), 0);
}

#[tokio::test]
async fn test_appeal_totals_roll_up_on_settlement() {
    let server = TestServer::start().await.expect("Failed to start server");
    let appeal_id = server
        .seed_appeal("New Roof", Some(100_000))
        .await
        .expect("seed failed");

    let request = DonationRequest::one_time(2_500).with_appeal(appeal_id);
    let (_donation_id, intent_ref) = intake(&server, &request).await;

    // Pending money is not progress yet.
    let response = server
        .get(&format!("/api/appeals/{appeal_id}"))
        .await
        .unwrap();
    let appeal: AppealBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(appeal.raised_amount, 0);

    let response = server
        .post_webhook(&payment_succeeded_event(&intent_ref))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("/api/appeals/{appeal_id}"))
        .await
        .unwrap();
    let appeal: AppealBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(appeal.raised_amount, 2_500);
    assert_eq!(appeal.donor_count, 1);
    assert_eq!(appeal.percent_funded, Some(2.5));
    assert!(appeal.active);
}

#[tokio::test]
async fn test_invoice_paid_records_cycle_donation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::recurring(2_000, "monthly");
    let email = request.email.clone();

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let subscription_ref = server.subscriptions.all()[0].processor_ref.clone();

    let response = server
        .post_webhook(&invoice_paid_event("in_100", &subscription_ref, 2_000, "gbp"))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // The intake row stays pending; the cycle lands as its own settled row.
    let donations = server.donations.all();
    assert_eq!(donations.len(), 2);
    let cycle = donations
        .iter()
        .find(|d| d.payment.intent_ref.as_deref() == Some("in_100"))
        .expect("cycle row missing");
    assert_eq!(cycle.status.as_str(), "completed");
    assert_eq!(cycle.amount, 2_000);
    assert_eq!(cycle.total, 2_000);
    assert_eq!(cycle.donation_type, "recurring");
    assert_eq!(cycle.frequency, Frequency::Monthly);

    let donor = server.donors.get_by_email(&email).expect("donor missing");
    assert_eq!(donor.total_donated, 2_000);
    assert_eq!(server.notifier.count(), 1);
}

#[tokio::test]
async fn test_invoice_redelivery_creates_single_row() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::recurring(1_200, "monthly");
    let email = request.email.clone();

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let subscription_ref = server.subscriptions.all()[0].processor_ref.clone();

    let event = invoice_paid_event("in_repeat", &subscription_ref, 1_200, "gbp");
    for _ in 0..2 {
        let response = server.post_webhook(&event).await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    assert_eq!(server.donations.count(), 2);
    assert!(server.ledger.claimed("in_repeat"));
    let donor = server.donors.get_by_email(&email).expect("donor missing");
    assert_eq!(donor.total_donated, 1_200);
    assert_eq!(donor.donation_count, 1);
}

#[tokio::test]
async fn test_subscription_update_applies_status_and_schedule() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::recurring(1_000, "monthly");

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let subscription_ref = server.subscriptions.all()[0].processor_ref.clone();

    let period_end = chrono::Utc::now().timestamp() + 30 * 24 * 3_600;
    let response = server
        .post_webhook(&subscription_updated_event(
            &subscription_ref,
            "past_due",
            period_end,
        ))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let subscription = server.subscriptions.get(&subscription_ref).expect("row missing");
    assert_eq!(subscription.status, SubscriptionStatus::Paused);
    assert_eq!(
        subscription.next_payment_at.map(|t| t.timestamp()),
        Some(period_end)
    );
}

#[tokio::test]
async fn test_subscription_update_unmapped_status_ignored() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::recurring(1_000, "monthly");

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let subscription_ref = server.subscriptions.all()[0].processor_ref.clone();

    let response = server
        .post_webhook(&subscription_updated_event(&subscription_ref, "wibble", 0))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let subscription = server.subscriptions.get(&subscription_ref).expect("row missing");
    assert_eq!(subscription.status, SubscriptionStatus::Active);
}

#[tokio::test]
async fn test_subscription_deleted_cancels_plan() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = DonationRequest::recurring(1_000, "monthly");

    let response = server
        .post("/api/donations/create-payment", &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let subscription_ref = server.subscriptions.all()[0].processor_ref.clone();

    let event = subscription_deleted_event(&subscription_ref);
    let response = server.post_webhook(&event).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let subscription = server.subscriptions.get(&subscription_ref).expect("row missing");
    assert_eq!(subscription.status, SubscriptionStatus::Cancelled);
    assert!(subscription.next_payment_at.is_none());

    // Redelivery is acknowledged without complaint.
    let response = server.post_webhook(&event).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_unrecognized_event_acknowledged() {
    let server = TestServer::start().await.expect("Failed to start server");
    let event = serde_json::json!({
        "id": "evt_odd",
        "type": "charge.refunded",
        "data": {"object": {"id": "ch_1"}}
    });

    let response = server.post_webhook(&event).await.unwrap();
    let ack: AckBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(ack.received);
}

#[tokio::test]
async fn test_receipt_failure_does_not_block_settlement() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.notifier.reject_sends();

    let request = DonationRequest::one_time(1_000);
    let (donation_id, intent_ref) = intake(&server, &request).await;

    let response = server
        .post_webhook(&payment_succeeded_event(&intent_ref))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let donation = server.donations.get(donation_id).expect("row missing");
    assert_eq!(donation.status.as_str(), "completed");
    assert_eq!(server.notifier.count(), 0);
}
