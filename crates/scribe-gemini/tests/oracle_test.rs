use scribe_engine::config::OracleConfig;
use scribe_engine::naming::{NamingError, NamingOracle};
use scribe_gemini::{GeminiClient, GeminiOracle, oracle_from_config};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve exactly one HTTP request with a canned response. Returns the base
/// URL and a handle resolving to the raw request that was received.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{}/v1beta", addr), handle)
}

fn request_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

fn oracle_for(base_url: &str) -> GeminiOracle {
    let client =
        GeminiClient::new(base_url, "gemini-2.5-flash", "test-key", Duration::from_secs(5)).unwrap();
    GeminiOracle::new(client)
}

#[tokio::test]
async fn test_oracle_returns_trimmed_reply() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{"text":"  LoginButton\n"}]}}]}"#,
    )
    .await;

    let name = oracle_for(&url)
        .suggest_name("//XCUIElementTypeButton[@name='Login']")
        .await
        .unwrap();
    assert_eq!(name, "LoginButton");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
    assert!(request.to_lowercase().contains("x-goog-api-key: test-key"));
    assert!(request.contains("XPath: //XCUIElementTypeButton[@name='Login']"));
}

#[tokio::test]
async fn test_error_status_is_a_request_error() {
    let (url, server) = serve_once("403 Forbidden", r#"{"error":{"code":403}}"#).await;

    let err = oracle_for(&url).suggest_name("//A").await.unwrap_err();
    assert!(matches!(err, NamingError::Request(ref msg) if msg.contains("403")));
    server.await.unwrap();
}

#[tokio::test]
async fn test_reply_without_text_is_malformed() {
    let (url, server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;

    let err = oracle_for(&url).suggest_name("//A").await.unwrap_err();
    assert!(matches!(err, NamingError::MalformedResponse(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn test_disabled_or_keyless_config_is_offline() {
    let disabled = OracleConfig {
        enabled: false,
        ..Default::default()
    };
    let err = oracle_from_config(&disabled)
        .suggest_name("//A")
        .await
        .unwrap_err();
    assert!(matches!(err, NamingError::Offline));

    let keyless = OracleConfig {
        api_key_env: "SCRIBE_TEST_KEY_THAT_IS_NEVER_SET".into(),
        ..Default::default()
    };
    let err = oracle_from_config(&keyless)
        .suggest_name("//A")
        .await
        .unwrap_err();
    assert!(matches!(err, NamingError::Offline));
}
