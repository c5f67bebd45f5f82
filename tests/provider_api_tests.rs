use readmegen::ErrorKind;
use readmegen::llm_providers::{AnthropicBackend, GeminiBackend, LLMBackend, OpenAIBackend};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned HTTP response on an ephemeral port and return the
/// base URL to point a backend at.
async fn spawn_one_shot_server(status_line: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let mut request = Vec::new();
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        request.extend_from_slice(&buf[..n]);
                        // Header terminator is enough; these are GET requests
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                }
            }
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.flush().await;
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_gemini_list_models_strips_prefix_and_sorts() {
    let body = r#"{"models":[{"name":"models/gemini-2.0-flash"},{"name":"models/gemini-1.5-pro"}]}"#;
    let base = spawn_one_shot_server("200 OK", body).await;

    let backend = GeminiBackend::new("test-key").with_base_url(base);
    let models = backend.list_models().await.expect("list models");
    assert_eq!(models, vec!["gemini-1.5-pro", "gemini-2.0-flash"]);
}

#[tokio::test]
async fn test_openai_list_models_reads_data_ids() {
    let body = r#"{"data":[{"id":"gpt-4o-mini"},{"id":"gpt-4o"}]}"#;
    let base = spawn_one_shot_server("200 OK", body).await;

    let backend = OpenAIBackend::new("test-key").with_base_url(base);
    let models = backend.list_models().await.expect("list models");
    assert_eq!(models, vec!["gpt-4o", "gpt-4o-mini"]);
}

#[tokio::test]
async fn test_anthropic_list_models_reads_data_ids() {
    let body = r#"{"data":[{"id":"claude-sonnet-4-5-20250929"}]}"#;
    let base = spawn_one_shot_server("200 OK", body).await;

    let backend = AnthropicBackend::new("test-key").with_base_url(base);
    let models = backend.list_models().await.expect("list models");
    assert_eq!(models, vec!["claude-sonnet-4-5-20250929"]);
}

#[tokio::test]
async fn test_unauthorized_response_is_auth_error() {
    let base = spawn_one_shot_server("401 Unauthorized", r#"{"error":"bad key"}"#).await;

    let backend = OpenAIBackend::new("wrong-key").with_base_url(base);
    let err = backend.list_models().await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ProviderAuth);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_error_response_is_transient() {
    let base = spawn_one_shot_server("503 Service Unavailable", r#"{"error":"overloaded"}"#).await;

    let backend = AnthropicBackend::new("test-key").with_base_url(base);
    let err = backend.list_models().await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::TransientProvider);
    assert!(err.is_retryable());
}
