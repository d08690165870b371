//! REST gateway adapter against a wiremock server.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use gepx_client::ledger::{HttpGateway, Identity, LedgerGateway, OrgSet};
use gepx_client::models::RecordKind;
use gepx_client::pipeline::{Operation, Pipeline, PipelineSettings, TransactionBuilder};
use gepx_client::{GepxError, RecordStatus};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVALUATE_PATH: &str = "/channels/mychannel/contracts/gepx/evaluate";
const SUBMIT_PATH: &str = "/channels/mychannel/contracts/gepx/submit";

fn identity() -> Identity {
    Identity {
        label: "appUser".into(),
        msp_id: "Org1MSP".into(),
        certificate: "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n".into(),
    }
}

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(
        &server.uri(),
        "mychannel",
        "gepx",
        &identity(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn close_invocation() -> gepx_client::ledger::PendingInvocation {
    TransactionBuilder::build_invocation(
        "CloseSession",
        OrgSet::pair("Org1MSP", "Org2MSP"),
        vec!["R1".into()],
        None,
    )
    .unwrap()
}

#[tokio::test]
async fn test_evaluate_sends_identity_and_returns_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVALUATE_PATH))
        .and(header("x-gepx-msp-id", "Org1MSP"))
        .and(header("x-gepx-user", "appUser"))
        .and(body_json(json!({"function": "QuerySession", "args": ["R1"]})))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"Open"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let raw = gateway(&server)
        .evaluate("QuerySession", &["R1".to_string()])
        .await
        .unwrap();
    assert_eq!(raw, br#"{"status":"Open"}"#);
}

#[tokio::test]
async fn test_evaluate_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVALUATE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such key"})))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .evaluate("QuerySession", &["R9".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err, GepxError::not_found("R9"));
}

#[tokio::test]
async fn test_submit_encodes_transient_and_endorsers() {
    let server = MockServer::start().await;
    let payload = br#"{"bidType":"sell","volume":10}"#.to_vec();
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .and(body_json(json!({
            "function": "FinalizeBid",
            "args": ["R2", "tx1"],
            "transient": {"bid": STANDARD.encode(&payload)},
            "endorsingOrganizations": ["Org1MSP", "Org2MSP"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactionId": "abc123",
            "result": STANDARD.encode("ok"),
            "blockNumber": 42,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let invocation = TransactionBuilder::build_invocation(
        "FinalizeBid",
        OrgSet::pair("Org1MSP", "Org2MSP"),
        vec!["R2".into(), "tx1".into()],
        Some(payload),
    )
    .unwrap();

    let receipt = gateway(&server).submit(&invocation).await.unwrap();
    assert_eq!(receipt.transaction_id, "abc123");
    assert_eq!(receipt.block_number, Some(42));
    assert_eq!(receipt.result_text().unwrap().as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_submit_status_mapping() {
    let cases = [
        (409, json!({"message": "stale read"}), "conflict"),
        (
            500,
            json!({"message": "validation failed", "code": "MVCC_READ_CONFLICT"}),
            "conflict",
        ),
        (422, json!({"message": "peer refused"}), "endorsement"),
        (403, json!({"error": "policy"}), "endorsement"),
        (401, json!({"message": "unknown cert"}), "identity"),
        (503, json!({"message": "down"}), "connectivity"),
        (500, json!({"message": "boom"}), "commit"),
    ];

    for (status, body, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUBMIT_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        let err = gateway(&server).submit(&close_invocation()).await.unwrap_err();
        let kind = match &err {
            GepxError::Commit { conflict: true, .. } => "conflict",
            GepxError::Commit { conflict: false, .. } => "commit",
            GepxError::Endorsement(_) => "endorsement",
            GepxError::Identity(_) => "identity",
            GepxError::Connectivity(_) => "connectivity",
            other => panic!("unexpected error for {status}: {other:?}"),
        };
        assert_eq!(kind, expected, "status {status}");
    }
}

#[tokio::test]
async fn test_undecodable_receipt_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("committed!"))
        .mount(&server)
        .await;

    let err = gateway(&server).submit(&close_invocation()).await.unwrap_err();
    assert!(matches!(err, GepxError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_unreachable_gateway_is_connectivity_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let gateway = HttpGateway::new(&uri, "mychannel", "gepx", &identity(), Duration::from_secs(1))
        .unwrap();
    let err = gateway
        .evaluate("QuerySession", &["R1".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, GepxError::Connectivity(_)));
}

#[tokio::test]
async fn test_pipeline_over_rest_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVALUATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "admin": "x509::/CN=admin",
            "organizations": ["Org1MSP", "Org2MSP"],
            "privateBids": {},
            "finalizedBids": {},
            "status": "Open",
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .and(body_partial_json(json!({
            "function": "CloseSession",
            "endorsingOrganizations": ["Org1MSP", "Org2MSP"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"transactionId": "tx77"})))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(
        Arc::new(gateway(&server)),
        PipelineSettings::new(RecordKind::Session, "Org1MSP"),
    );
    let outcome = pipeline.run("R1", &Operation::Close).await.unwrap();

    assert_eq!(outcome.receipt.transaction_id, "tx77");
    assert_eq!(outcome.record().status, RecordStatus::Open);
}
