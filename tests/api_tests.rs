// HTTP-level tests for the Lume Swipe API

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lume_swipe::config::PaymentMode;
use lume_swipe::core::CandidateSelector;
use lume_swipe::error::{handle_json_payload_error, handle_query_payload_error};
use lume_swipe::models::PaymentRequirement;
use lume_swipe::routes::{self, AppState};
use lume_swipe::services::{
    DatingService, MemoryStore, PaymentError, PaymentGate, PaymentVerifier, PromptCatalog, Receipt,
    Verification, VerificationStatus,
};

/// Accepts exactly one signature
struct FixedVerifier;

#[async_trait]
impl PaymentVerifier for FixedVerifier {
    async fn verify(&self, signature: &str) -> Result<Verification, PaymentError> {
        Ok(if signature == "good-signature" {
            Verification {
                valid: true,
                status: VerificationStatus::Success,
            }
        } else {
            Verification {
                valid: false,
                status: VerificationStatus::NotFound,
            }
        })
    }

    async fn charge(&self, _wallet: &str) -> Result<Receipt, PaymentError> {
        Err(PaymentError::Rejected("no escrow".to_string()))
    }
}

fn state(payment: Option<Arc<PaymentGate>>) -> AppState {
    let service = DatingService::new(
        Arc::new(MemoryStore::new()),
        CandidateSelector::default(),
        PromptCatalog::new(Duration::from_secs(60)),
    );
    AppState {
        service: Arc::new(service),
        payment,
    }
}

/// Escrow that accepts every charge and counts them
#[derive(Default)]
struct CountingEscrow {
    charges: AtomicUsize,
}

#[async_trait]
impl PaymentVerifier for CountingEscrow {
    async fn verify(&self, _signature: &str) -> Result<Verification, PaymentError> {
        Ok(Verification {
            valid: false,
            status: VerificationStatus::NotFound,
        })
    }

    async fn charge(&self, wallet: &str) -> Result<Receipt, PaymentError> {
        let n = self.charges.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Receipt {
            signature: format!("{}-{}", wallet, n),
        })
    }
}

fn challenge_gate() -> Arc<PaymentGate> {
    gate(Arc::new(FixedVerifier), PaymentMode::Challenge)
}

fn gate(verifier: Arc<dyn PaymentVerifier>, mode: PaymentMode) -> Arc<PaymentGate> {
    Arc::new(PaymentGate::new(
        verifier,
        mode,
        PaymentRequirement {
            scheme: "exact".to_string(),
            network: "solana-devnet".to_string(),
            asset: "USDC".to_string(),
            pay_to: "treasury".to_string(),
            amount: "0.01".to_string(),
        },
        Duration::from_secs(60),
    ))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn profile_body(wallet: &str, name: &str, gender: &str) -> Value {
    json!({
        "publicKey": wallet,
        "name": name,
        "age": 28,
        "gender": gender,
        "orientation": "straight",
        "country": "US",
        "state": "CA",
        "city": "San Diego"
    })
}

#[actix_web::test]
async fn test_health_check() {
    let app = app!(state(None));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_full_like_match_flow() {
    let app = app!(state(None));

    for (wallet, name, gender) in [("wallet-a", "Ana", "FEMALE"), ("wallet-b", "Ben", "MALE")] {
        let req = test::TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "walletPublicKey": wallet }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/user/profile")
            .set_json(profile_body(wallet, name, gender))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/user/wallet-a/preferences")
        .set_json(json!({
            "preferredGenders": ["MALE"],
            "ageMin": 21,
            "ageMax": 40,
            "locationScope": "SAME_CITY"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/user/wallet-a/next-suggestion")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["walletPubKey"], "wallet-b");
    assert_eq!(body["data"]["profile"]["displayName"], "Ben");

    let req = test::TestRequest::post()
        .uri("/api/user/swipe/wallet-a/like")
        .set_json(json!({ "toWhom": "wallet-b" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["isMatch"], false);
    assert_eq!(body["message"], "User liked successfully");

    let req = test::TestRequest::post()
        .uri("/api/user/swipe/wallet-b/like")
        .set_json(json!({ "toWhom": "wallet-a" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["isMatch"], true);
    assert_eq!(body["message"], "It's a match!");

    let req = test::TestRequest::get()
        .uri("/api/user/swipe/wallet-a/matches")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["user"]["walletPubKey"], "wallet-b");
    assert_eq!(body["data"][0]["user"]["displayName"], "Ben");

    let req = test::TestRequest::get()
        .uri("/api/user/swipe/wallet-b/likes")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["user"]["displayName"], "Ana");

    // Everyone has been swiped on
    let req = test::TestRequest::get()
        .uri("/api/user/wallet-a/next-suggestion")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
    assert_eq!(body["message"], "No more suggestions available");
}

#[actix_web::test]
async fn test_error_envelopes() {
    let app = app!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/user")
        .set_json(json!({ "walletPublicKey": "dup" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/user")
        .set_json(json!({ "walletPublicKey": "dup" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false, "error": "User already exists" }));

    let req = test::TestRequest::post()
        .uri("/api/user/swipe/dup/like")
        .set_json(json!({ "toWhom": "dup" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Cannot like yourself");

    let req = test::TestRequest::post()
        .uri("/api/user/swipe/dup/report")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/user/swipe/dup/like")
        .set_json(json!({ "toWhom": "nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Target user not found");

    let req = test::TestRequest::get().uri("/api/user/ghost").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/user")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let req = test::TestRequest::get()
        .uri("/api/user/dup/next-suggestion")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "User profile not found. Please create a profile first."
    );
}

#[actix_web::test]
async fn test_profile_and_preferences_lifecycle() {
    let app = app!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/user")
        .set_json(json!({ "walletPublicKey": "w" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri("/api/user/profile")
        .set_json(json!({ "publicKey": "w", "bio": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/user/profile")
        .set_json(profile_body("w", "Wren", "NON_BINARY"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/user/profile")
        .set_json(profile_body("w", "Wren", "NON_BINARY"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri("/api/user/profile")
        .set_json(json!({ "publicKey": "w", "bio": "hello", "age": 17 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/user/profile")
        .set_json(json!({ "publicKey": "w", "bio": "hello" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/user/w/preferences").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let prefs = json!({
        "preferredGenders": [],
        "ageMin": 30,
        "ageMax": 25,
        "locationScope": "ANY"
    });
    let req = test::TestRequest::post()
        .uri("/api/user/w/preferences")
        .set_json(prefs)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let prefs = json!({ "preferredGenders": ["FEMALE"], "locationScope": "SAME_COUNTRY" });
    let req = test::TestRequest::post()
        .uri("/api/user/w/preferences")
        .set_json(prefs.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/user/w/preferences")
        .set_json(prefs)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri("/api/user/w/preferences")
        .set_json(json!({ "preferredGenders": ["MALE"], "locationScope": "ANY" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/user/w").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["walletPubKey"], "w");
    assert_eq!(body["data"]["profile"]["bio"], "hello");
    assert_eq!(body["data"]["preferences"]["preferredGenders"], json!(["MALE"]));
}

#[actix_web::test]
async fn test_prompts_and_photos() {
    let app = app!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/user")
        .set_json(json!({ "walletPublicKey": "p" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/user/p/prompts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let count = body["count"].as_u64().unwrap();
    assert!(count > 0);
    let prompt_id = body["data"][0]["id"].clone();

    let req = test::TestRequest::post()
        .uri("/api/user/p/prompts")
        .set_json(json!({ "answers": [] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/user/p/prompts")
        .set_json(json!({ "answers": [{ "promptId": prompt_id, "answer": "Sunrise hikes" }] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["stored"], 1);

    let req = test::TestRequest::post()
        .uri("/api/user/p/photos")
        .set_json(json!({ "url": "not a url" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/user/p/photos")
        .set_json(json!({ "url": "https://cdn.example/p.jpg" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/user/p/photos").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["order"], 0);
}

#[actix_web::test]
async fn test_payment_gate_on_suggestions() {
    let app = app!(state(Some(challenge_gate())));

    for (wallet, name, gender) in [("payer", "Pat", "FEMALE"), ("other", "Oli", "MALE")] {
        let req = test::TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "walletPublicKey": wallet }))
            .to_request();
        test::call_service(&app, req).await;
        let req = test::TestRequest::post()
            .uri("/api/user/profile")
            .set_json(profile_body(wallet, name, gender))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/user/payer/next-suggestion")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["accepts"][0]["payTo"], "treasury");

    let req = test::TestRequest::get()
        .uri("/api/user/payer/next-suggestion")
        .insert_header(("X-PAYMENT", "forged"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "NOT_FOUND");

    let req = test::TestRequest::get()
        .uri("/api/user/payer/next-suggestion")
        .insert_header(("X-PAYMENT", "good-signature"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["walletPubKey"], "other");

    // One payment buys one suggestion
    let req = test::TestRequest::get()
        .uri("/api/user/payer/next-suggestion")
        .insert_header(("X-PAYMENT", "good-signature"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);

    // Unknown wallets are not asked to pay
    let req = test::TestRequest::get()
        .uri("/api/user/stranger/next-suggestion")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_signature_survives_missing_profile() {
    let app = app!(state(Some(challenge_gate())));

    let req = test::TestRequest::post()
        .uri("/api/user")
        .set_json(json!({ "walletPublicKey": "early" }))
        .to_request();
    test::call_service(&app, req).await;

    // No profile yet: refused before the signature is redeemed
    let req = test::TestRequest::get()
        .uri("/api/user/early/next-suggestion")
        .insert_header(("X-PAYMENT", "good-signature"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User profile not found. Please create a profile first.");

    let req = test::TestRequest::post()
        .uri("/api/user")
        .set_json(json!({ "walletPublicKey": "other" }))
        .to_request();
    test::call_service(&app, req).await;

    for (wallet, name, gender) in [("early", "Eve", "FEMALE"), ("other", "Oli", "MALE")] {
        let req = test::TestRequest::post()
            .uri("/api/user/profile")
            .set_json(profile_body(wallet, name, gender))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/user/early/next-suggestion")
        .insert_header(("X-PAYMENT", "good-signature"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["walletPubKey"], "other");
}

#[actix_web::test]
async fn test_escrow_not_charged_without_profile() {
    let escrow = Arc::new(CountingEscrow::default());
    let app = app!(state(Some(gate(escrow.clone(), PaymentMode::Escrow))));

    let req = test::TestRequest::post()
        .uri("/api/user")
        .set_json(json!({ "walletPublicKey": "early" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/user/early/next-suggestion")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(escrow.charges.load(Ordering::SeqCst), 0);

    let req = test::TestRequest::post()
        .uri("/api/user/profile")
        .set_json(profile_body("early", "Eve", "FEMALE"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/user/early/next-suggestion")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(escrow.charges.load(Ordering::SeqCst), 1);
}
