/// Relay forwarding integration tests
///
/// These tests run the HTTP forwarder against a local mock relay:
/// - Wire format and authentication headers
/// - Status code handling
/// - Network failures, timeouts and cancellation
#[path = "common/mod.rs"]
mod common;

use chrono::DateTime;
use futures::FutureExt;
use quanianitis_core::{
    ClientSettings, MailForwarder, QuanianitisError, create_mail, never_cancelled,
};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn forward_posts_payload_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("Authorization", "Bearer test-identity-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(common::sample_payload()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let forwarder = common::forwarder_for(&server.uri(), ClientSettings::default());
    let result = forwarder
        .forward(&common::sample_mail(), never_cancelled())
        .await;

    assert!(result.is_ok(), "forward failed: {:?}", result);
}

#[tokio::test]
async fn forward_honours_endpoint_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sendgrid"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/sendgrid", server.uri());
    let forwarder = common::forwarder_for(&endpoint, ClientSettings::default());

    assert_eq!(forwarder.endpoint().path(), "/sendgrid");
    forwarder
        .forward(&common::sample_mail(), never_cancelled())
        .await
        .unwrap();
}

#[tokio::test]
async fn create_persists_state_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("queued"))
        .expect(1)
        .mount(&server)
        .await;

    let forwarder = common::forwarder_for(&server.uri(), ClientSettings::default());
    let mail = common::sample_mail();
    let state = create_mail(&forwarder, &mail, never_cancelled())
        .await
        .unwrap();

    assert!(uuid::Uuid::parse_str(&state.id).is_ok());
    assert!(DateTime::parse_from_rfc3339(&state.created_at).is_ok());
    assert_eq!(state.from, mail.from_address);
    assert_eq!(state.to, mail.to_address);
    assert_eq!(state.subject, mail.subject);
    assert_eq!(state.content, mail.plain_text_content);
}

#[tokio::test]
async fn server_error_is_remote_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom for bob@example.com"))
        .expect(1)
        .mount(&server)
        .await;

    let forwarder = common::forwarder_for(&server.uri(), ClientSettings::default());
    let err = create_mail(&forwarder, &common::sample_mail(), never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(err, QuanianitisError::RemoteRejected(500)));
}

#[tokio::test]
async fn large_rejection_body_is_not_buffered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_bytes(vec![b'x'; 8 * 1024 * 1024]))
        .expect(1)
        .mount(&server)
        .await;

    let forwarder = common::forwarder_for(&server.uri(), ClientSettings::default());
    let err = tokio::time::timeout(
        Duration::from_secs(5),
        forwarder.forward(&common::sample_mail(), never_cancelled()),
    )
    .await
    .expect("rejection returns promptly")
    .unwrap_err();

    assert!(matches!(err, QuanianitisError::RemoteRejected(500)));
}

#[tokio::test]
async fn stalled_rejection_body_does_not_block() {
    let endpoint = common::start_stalling_rejection_server().await;

    let settings = ClientSettings::builder()
        .timeout(Duration::from_secs(20))
        .build();
    let forwarder = common::forwarder_for(&endpoint, settings);
    let err = tokio::time::timeout(
        Duration::from_secs(3),
        forwarder.forward(&common::sample_mail(), never_cancelled()),
    )
    .await
    .expect("status is reported without waiting for the full body")
    .unwrap_err();

    assert!(matches!(err, QuanianitisError::RemoteRejected(500)));
}

#[tokio::test]
async fn client_error_is_remote_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let forwarder = common::forwarder_for(&server.uri(), ClientSettings::default());
    let err = forwarder
        .forward(&common::sample_mail(), never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(err, QuanianitisError::RemoteRejected(401)));
}

#[tokio::test]
async fn redirect_status_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let forwarder = common::forwarder_for(&server.uri(), ClientSettings::default());
    let err = forwarder
        .forward(&common::sample_mail(), never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(err, QuanianitisError::RemoteRejected(304)));
}

#[tokio::test]
async fn dropped_connection_is_forward_error() {
    let endpoint = common::start_dropping_server().await;

    let forwarder = common::forwarder_for(&endpoint, ClientSettings::default());
    let err = create_mail(&forwarder, &common::sample_mail(), never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(err, QuanianitisError::Forward(_)), "got {:?}", err);
}

#[tokio::test]
async fn connection_refused_is_forward_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let forwarder = common::forwarder_for(&endpoint, ClientSettings::default());
    let err = forwarder
        .forward(&common::sample_mail(), never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(err, QuanianitisError::Forward(_)), "got {:?}", err);
}

#[tokio::test]
async fn slow_relay_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let settings = ClientSettings::builder()
        .timeout(Duration::from_millis(200))
        .build();
    let forwarder = common::forwarder_for(&server.uri(), settings);
    let err = forwarder
        .forward(&common::sample_mail(), never_cancelled())
        .await
        .unwrap_err();

    match err {
        QuanianitisError::Forward(msg) => assert!(msg.contains("timed out"), "got {}", msg),
        other => panic!("expected forward error, got {:?}", other),
    }
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let forwarder = common::forwarder_for(&server.uri(), ClientSettings::default());
    let cancel = tokio::time::sleep(Duration::from_millis(100)).boxed();
    let err = create_mail(&forwarder, &common::sample_mail(), cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, QuanianitisError::Cancelled));
}
