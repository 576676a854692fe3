//! Integration tests against a stub provider.
//!
//! Each test spins up an axum server on an ephemeral port playing the role
//! of the TigoPesa API, mirroring the provider's observed response bodies.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::Mutex;
use tokio::net::TcpListener;

use tigopesa_client::TigoPesaClient;
use tigopesa_types::{
    ChargeCommand, Credentials, Msisdn, ProviderError, ResponseCode, ReversalCommand,
};

async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Deserialize)]
struct TokenForm {
    user_name: String,
    password: String,
    grant_type: String,
}

fn token_stub() -> Router {
    Router::new().route(
        "/token",
        post(|Form(form): Form<TokenForm>| async move {
            if form.user_name == "username"
                && form.password == "password"
                && form.grant_type == "password"
            {
                Json(json!({
                    "access_token": "T",
                    "token_type": "bearer",
                    "expires_in": 1000
                }))
            } else {
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "Provided username and password is incorrect"
                }))
            }
        }),
    )
}

#[tokio::test]
async fn test_authenticate_returns_access_token() {
    let base_url = spawn_stub(token_stub()).await;
    let client = TigoPesaClient::new(base_url);

    let token = client
        .authenticate(&Credentials::new("username", "password"))
        .await
        .unwrap();

    assert_eq!(token.token, "T");
    assert_eq!(token.token_type, "bearer");
    assert_eq!(token.expires_in, 1000);
}

#[tokio::test]
async fn test_authenticate_invalid_grant() {
    let base_url = spawn_stub(token_stub()).await;
    let client = TigoPesaClient::new(base_url);

    let err = client
        .authenticate(&Credentials::new("username", "wrong password"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ResponseCode::InvalidGrant);
    assert_eq!(err.message(), "Provided username and password is incorrect");
}

#[tokio::test]
async fn test_authenticate_maps_non_success_status() {
    let app = Router::new().route(
        "/token",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "unsupported_grant_type",
                    "error_description": "Invalid grant type"
                })),
            )
        }),
    );
    let client = TigoPesaClient::new(spawn_stub(app).await);

    let err = client
        .authenticate(&Credentials::new("username", "password"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ResponseCode::UnsupportedGrantType);
    assert_eq!(err.message(), "Invalid grant type");
}

fn charge_command(base: &ChargeParts) -> ChargeCommand {
    ChargeCommand {
        token: base.token.clone(),
        username: "username".into(),
        password: "password".into(),
        msisdn: Msisdn::new("255123456789").unwrap(),
        biller_msisdn: Msisdn::new("255987654321").unwrap(),
        amount: 5000,
        reference: base.reference.clone(),
        remarks: Some("remarks".into()),
    }
}

struct ChargeParts {
    token: String,
    reference: String,
}

#[tokio::test]
async fn test_charge_customer_success() {
    // The stub verifies headers and body before answering SUCCESS.
    let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let seen_in_handler = seen.clone();
    let app = Router::new()
        .route(
            "/API/BillerPayment/BillerPay",
            post(
                |State(seen): State<Arc<Mutex<Option<Value>>>>,
                 headers: HeaderMap,
                 Json(body): Json<Value>| async move {
                    let authorized = headers
                        .get("authorization")
                        .is_some_and(|v| v.to_str().unwrap_or("") == "Bearer T")
                        && headers
                            .get("username")
                            .is_some_and(|v| v.to_str().unwrap_or("") == "username")
                        && headers
                            .get("password")
                            .is_some_and(|v| v.to_str().unwrap_or("") == "password");
                    if !authorized {
                        return Json(json!({
                            "ResponseCode": "DebitMandate-10-3000-E",
                            "ResponseDescription": "Invalid username or password"
                        }));
                    }
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({
                        "ResponseCode": "BILLER-18-0000-S",
                        "ResponseStatus": true,
                        "ResponseDescription": "Valid Request",
                        "ReferenceID": "DEMOreference"
                    }))
                },
            ),
        )
        .with_state(seen_in_handler);
    let client = TigoPesaClient::new(spawn_stub(app).await);

    client
        .charge_customer(&charge_command(&ChargeParts {
            token: "T".into(),
            reference: "DEMOreference".into(),
        }))
        .await
        .unwrap();

    let body = seen.lock().unwrap().take().unwrap();
    assert_eq!(body["CustomerMSISDN"], "255123456789");
    assert_eq!(body["BillerMSISDN"], "255987654321");
    assert_eq!(body["Amount"], 5000);
    assert_eq!(body["Remarks"], "remarks");
    assert_eq!(body["ReferenceID"], "DEMOreference");
}

#[tokio::test]
async fn test_charge_customer_internal_service_error() {
    let app = Router::new().route(
        "/API/BillerPayment/BillerPay",
        post(|| async {
            Json(json!({
                "ResponseCode": "DebitMandate-10-1000-E",
                "ResponseStatus": false,
                "ResponseDescription": "Internal service error",
                "ReferenceID": "DEMOreference"
            }))
        }),
    );
    let client = TigoPesaClient::new(spawn_stub(app).await);

    let err = client
        .charge_customer(&charge_command(&ChargeParts {
            token: "T".into(),
            reference: "DEMOreference".into(),
        }))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ResponseCode::InternalServiceError);
    assert_eq!(err.code().name(), "INTERNAL_SERVICE_ERROR");
    assert_eq!(err.reference(), Some("DEMOreference"));
}

#[tokio::test]
async fn test_charge_customer_transport_failure() {
    // Nothing listens here; the connection is refused.
    let client = TigoPesaClient::new("http://127.0.0.1:1");

    let err = client
        .charge_customer(&charge_command(&ChargeParts {
            token: "T".into(),
            reference: "DEMOreference".into(),
        }))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Transport { .. }));
    assert_eq!(err.code(), ResponseCode::UnknownError);
}

#[tokio::test]
async fn test_heartbeat_echoes_reference() {
    let app = Router::new().route(
        "/API/Heartbeat/Heartbeat",
        post(|Json(body): Json<Value>| async move {
            Json(json!({ "ReferenceID": body["ReferenceID"] }))
        }),
    );
    let client = TigoPesaClient::new(spawn_stub(app).await);

    client
        .check_heartbeat(&Credentials::new("username", "password"), "reference")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_heartbeat_reference_mismatch() {
    let app = Router::new().route(
        "/API/Heartbeat/Heartbeat",
        post(|| async { Json(json!({ "ReferenceID": "invalid reference" })) }),
    );
    let client = TigoPesaClient::new(spawn_stub(app).await);

    let err = client
        .check_heartbeat(&Credentials::new("username", "password"), "reference")
        .await
        .unwrap_err();

    assert_eq!(err.code(), ResponseCode::InvalidResponse);
}

#[tokio::test]
async fn test_reverse_transaction_success() {
    let app = Router::new().route(
        "/API/Reverse/ReverseTransacation",
        post(|| async {
            Json(json!({
                "ResponseCode": "RefundTransaction-20-0000-S",
                "ResponseStatus": true,
                "ResponseDescription": "response description",
                "DMReferenceID": "dm reference",
                "ReferenceID": "reference",
                "MFSTransactionID": "transaction id"
            }))
        }),
    );
    let client = TigoPesaClient::new(spawn_stub(app).await);

    let reversal = client
        .reverse_transaction(&ReversalCommand {
            token: "T".into(),
            username: "username".into(),
            password: "password".into(),
            msisdn: Msisdn::new("255123456789").unwrap(),
            channel_msisdn: Msisdn::new("255987654321").unwrap(),
            channel_pin: "2355".into(),
            amount: 5000,
            transaction_id: "transaction id".into(),
            reference: "reference".into(),
            purchase_reference: "purchase reference".into(),
        })
        .await
        .unwrap();

    assert_eq!(reversal.description, "response description");
    assert_eq!(reversal.dm_reference, "dm reference");
    assert_eq!(reversal.reference, "reference");
    assert_eq!(reversal.transaction_id, "transaction id");
}

#[tokio::test]
async fn test_reverse_transaction_rejection() {
    let app = Router::new().route(
        "/API/Reverse/ReverseTransacation",
        post(|| async {
            Json(json!({
                "ResponseCode": "BILLER-18-3022-E",
                "ResponseDescription": "Biller not active"
            }))
        }),
    );
    let client = TigoPesaClient::new(spawn_stub(app).await);

    let err = client
        .reverse_transaction(&ReversalCommand {
            token: "T".into(),
            username: "username".into(),
            password: "password".into(),
            msisdn: Msisdn::new("255123456789").unwrap(),
            channel_msisdn: Msisdn::new("255987654321").unwrap(),
            channel_pin: "2355".into(),
            amount: 5000,
            transaction_id: "transaction id".into(),
            reference: "reference".into(),
            purchase_reference: "purchase reference".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), ResponseCode::BillerNotActive);
}
