//! Common test utilities for relay integration tests
#![allow(dead_code)]

use quanianitis_core::{
    ClientSettings, ConfigResolver, ConfigValue, HttpMailForwarder, MailRequest,
    RawProviderConfig,
};
use serde_json::{Value, json};

pub const TEST_TOKEN: &str = "test-identity-token";

/// A valid mail request used across tests
pub fn sample_mail() -> MailRequest {
    MailRequest::new(
        "work@quanianitis.com",
        "recipient@example.com",
        "Quarterly report",
        "Please find the numbers below.",
    )
    .expect("sample mail is valid")
}

/// The JSON body the relay should receive for `sample_mail`
pub fn sample_payload() -> Value {
    json!({
        "from_address": "work@quanianitis.com",
        "to_address": "recipient@example.com",
        "subject": "Quarterly report",
        "plain_text_content": "Please find the numbers below."
    })
}

/// Builds a forwarder pointed at `endpoint`, authenticating with `TEST_TOKEN`
pub fn forwarder_for(endpoint: &str, settings: ClientSettings) -> HttpMailForwarder {
    let raw = RawProviderConfig {
        endpoint: ConfigValue::known(endpoint),
        gcloud_identity_token: ConfigValue::Null,
    };
    let config = ConfigResolver::new(Some(TEST_TOKEN.to_string()))
        .resolve(&raw)
        .expect("config resolves");
    HttpMailForwarder::new(&config, &settings).expect("forwarder builds")
}

/// Starts a TCP server that accepts connections and closes them immediately
pub async fn start_dropping_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    format!("http://{}", addr)
}

/// Starts a TCP server that rejects every request with a 500 whose declared
/// body is far larger than what it sends, then keeps the connection open
pub async fn start_stalling_rejection_server() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;

                let head = "HTTP/1.1 500 Internal Server Error\r\n\
                            Content-Type: text/plain\r\n\
                            Content-Length: 67108864\r\n\r\n";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&[b'x'; 16 * 1024]).await;
                let _ = socket.flush().await;

                // Hold the socket open without sending the rest
                futures::future::pending::<()>().await;
            });
        }
    });

    format!("http://{}", addr)
}
