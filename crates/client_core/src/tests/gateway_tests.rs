use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{CryptoGateway, GatewayError, HttpGateway};

const MAX_MESSAGE_LEN: usize = 16;

#[derive(Clone, Default)]
struct GatewayServerState {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn record(state: &GatewayServerState, path: &str, body: Value) {
    state.bodies.lock().await.push((path.to_string(), body));
}

async fn handle_generate(State(state): State<GatewayServerState>) -> Json<Value> {
    record(&state, "generate-keys", Value::Null).await;
    Json(json!({ "publicKey": "PUB-KEY", "privateKey": "PRIV-KEY" }))
}

async fn handle_encrypt(
    State(state): State<GatewayServerState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "encrypt", body.clone()).await;
    let message = body["message"].as_str().unwrap_or_default();
    if message.len() > MAX_MESSAGE_LEN {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({ "encrypted": format!("enc:{message}") })))
}

async fn handle_decrypt(
    State(state): State<GatewayServerState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "decrypt", body.clone()).await;
    let ciphertext = body["encryptedMessage"].as_str().unwrap_or_default();
    match ciphertext.strip_prefix("enc:") {
        Some(plain) => Ok(Json(json!({ "decrypted": plain }))),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn handle_garbage() -> &'static str {
    "not json"
}

async fn spawn_gateway_server() -> anyhow::Result<(String, GatewayServerState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = GatewayServerState::default();
    let app = Router::new()
        .route("/api/rsa/generate-keys", post(handle_generate))
        .route("/api/rsa/encrypt", post(handle_encrypt))
        .route("/api/rsa/decrypt", post(handle_decrypt))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

async fn spawn_garbage_server() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/api/rsa/generate-keys", post(handle_garbage));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn generate_keys_decodes_camel_case_pair() {
    let (url, state) = spawn_gateway_server().await.expect("spawn server");
    let gateway = HttpGateway::new(&url).expect("gateway");

    let pair = gateway.generate_keys().await.expect("generate keys");

    assert_eq!(pair.public_key, "PUB-KEY");
    assert_eq!(pair.private_key, "PRIV-KEY");
    assert_eq!(state.bodies.lock().await.len(), 1);
}

#[tokio::test]
async fn encrypt_and_decrypt_send_expected_bodies() {
    let (url, state) = spawn_gateway_server().await.expect("spawn server");
    let gateway = HttpGateway::new(&format!("{url}/")).expect("gateway");

    let ciphertext = gateway.encrypt("PUB-KEY", "hi").await.expect("encrypt");
    let plaintext = gateway
        .decrypt("PRIV-KEY", &ciphertext)
        .await
        .expect("decrypt");

    assert_eq!(ciphertext, "enc:hi");
    assert_eq!(plaintext, "hi");
    let bodies = state.bodies.lock().await;
    assert_eq!(
        bodies[0],
        (
            "encrypt".to_string(),
            json!({ "publicKey": "PUB-KEY", "message": "hi" })
        )
    );
    assert_eq!(
        bodies[1],
        (
            "decrypt".to_string(),
            json!({ "privateKey": "PRIV-KEY", "encryptedMessage": "enc:hi" })
        )
    );
}

#[tokio::test]
async fn rejected_request_maps_to_gateway_error() {
    let (url, _state) = spawn_gateway_server().await.expect("spawn server");
    let gateway = HttpGateway::new(&url).expect("gateway");

    let err = gateway
        .encrypt("PUB-KEY", "this message is far too long for the modulus")
        .await
        .expect_err("oversized message should be rejected");

    assert!(matches!(
        err,
        GatewayError::Rejected {
            endpoint: "/api/rsa/encrypt",
            status: 400
        }
    ));

    let err = gateway
        .decrypt("PRIV-KEY", "tampered")
        .await
        .expect_err("bad ciphertext should be rejected");
    assert_eq!(err.endpoint(), Some("/api/rsa/decrypt"));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let url = spawn_garbage_server().await.expect("spawn server");
    let gateway = HttpGateway::new(&url).expect("gateway");

    let err = gateway.generate_keys().await.expect_err("garbage body");

    assert!(matches!(err, GatewayError::Decode { .. }), "{err}");
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let gateway = HttpGateway::new(&format!("http://{addr}")).expect("gateway");

    let err = gateway.generate_keys().await.expect_err("nothing listening");

    assert!(matches!(err, GatewayError::Transport { .. }), "{err}");
}

#[test]
fn invalid_base_url_is_rejected_up_front() {
    let err = HttpGateway::new("/api/rsa").expect_err("relative url");
    assert!(matches!(err, GatewayError::InvalidBaseUrl { .. }));
}

#[test]
fn base_url_drops_trailing_slash() {
    let gateway = HttpGateway::new("http://localhost:5000/").expect("gateway");
    assert_eq!(gateway.base_url(), "http://localhost:5000");
}
