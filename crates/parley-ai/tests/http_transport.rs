//! End-to-end checks of `ReqwestTransport` and `ChatSession::connect`
//! against a throwaway HTTP/1.1 server on localhost.

use std::time::Duration;

use parley_ai::{
    ChatError, ChatSession, HttpRequest, ReqwestTransport, SessionConfig, Transport,
    RATE_LIMIT_NOTICE,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

struct Captured {
    head: String,
    body: String,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn has_header(&self, line: &str) -> bool {
        self.head
            .lines()
            .any(|l| l.eq_ignore_ascii_case(line))
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

async fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let body_start = end + 4;
            let wanted = body_start + content_length(&head);
            while buf.len() < wanted {
                let n = stream.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed mid-body");
                buf.extend_from_slice(&chunk[..n]);
            }
            let body = String::from_utf8_lossy(&buf[body_start..wanted]).to_string();
            return Captured { head, body };
        }
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Answer one connection per response, in order.
async fn serve(responses: Vec<String>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            captured.push(read_request(&mut stream).await);
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
        captured
    });
    (format!("http://{addr}/"), handle)
}

fn http_response(status: &str, headers: &[&str], body: &str) -> String {
    let mut out = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for header in headers {
        out.push_str(header);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    out.push_str(body);
    out
}

const FINAL_EVENT: &str =
    r#"data: {"message":{"id":"m2","content":{"parts":["Hello!"]}},"conversation_id":"c1"}"#;

fn config(base_url: &str) -> SessionConfig {
    SessionConfig::new("abc")
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn full_turn_over_http() {
    let (url, server) = serve(vec![
        http_response(
            "200 OK",
            &[
                "Content-Type: application/json",
                "Set-Cookie: __Secure-next-auth.session-token=renewed; Path=/; HttpOnly",
            ],
            r#"{"accessToken":"tok1"}"#,
        ),
        http_response(
            "200 OK",
            &["Content-Type: text/event-stream"],
            &format!("{FINAL_EVENT}\n\ndata: [DONE]\n\n"),
        ),
    ])
    .await;

    let mut session = ChatSession::connect(config(&url)).unwrap();
    let reply = session.send_message("hi").await.unwrap();

    assert_eq!(reply, "Hello!");
    assert_eq!(session.conversation_id(), Some("c1"));
    assert_eq!(session.parent_message_id(), "m2");
    assert_eq!(session.session_token(), "renewed");

    let captured = server.await.unwrap();
    assert_eq!(captured[0].request_line(), "GET /api/auth/session HTTP/1.1");
    assert!(captured[0].has_header("cookie: __Secure-next-auth.session-token=abc"));

    assert_eq!(
        captured[1].request_line(),
        "POST /backend-api/conversation HTTP/1.1"
    );
    assert!(captured[1].has_header("authorization: Bearer tok1"));
    assert!(captured[1].has_header("content-type: application/json"));
    assert!(captured[1].has_header("accept: application/json"));

    let body: serde_json::Value = serde_json::from_str(&captured[1].body).unwrap();
    assert_eq!(body["action"], "next");
    assert_eq!(body["messages"][0]["content"]["parts"][0], "hi");
    assert_eq!(body["model"], "text-davinci-002-render");
}

#[tokio::test]
async fn rate_limit_over_http() {
    let (url, server) = serve(vec![
        http_response("200 OK", &[], r#"{"accessToken":"tok1"}"#),
        http_response("429 Too Many Requests", &[], r#"{"detail":"slow down"}"#),
    ])
    .await;

    let mut session = ChatSession::connect(config(&url)).unwrap();
    assert_eq!(session.send_message("hi").await.unwrap(), RATE_LIMIT_NOTICE);
    assert!(session.conversation_id().is_none());

    server.await.unwrap();
}

#[tokio::test]
async fn error_status_is_a_reply_not_an_error() {
    let (url, server) = serve(vec![http_response("404 Not Found", &[], "missing")]).await;

    let transport = ReqwestTransport::new(None, Duration::from_secs(5)).unwrap();
    let reply = transport
        .execute(HttpRequest::get(format!("{url}nowhere")))
        .await
        .unwrap();

    assert_eq!(reply.status, 404);
    assert_eq!(reply.body, "missing");
    assert!(!reply.is_success());
    server.await.unwrap();
}

#[tokio::test]
async fn slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        drop(stream);
    });

    let mut session = ChatSession::connect(
        SessionConfig::new("abc")
            .with_base_url(format!("http://{addr}/"))
            .with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = session.try_refresh_authorization().await.unwrap_err();
    assert!(matches!(err, ChatError::Timeout), "got {err:?}");
    server.abort();
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = ChatSession::connect(config(&format!("http://{addr}/"))).unwrap();

    let err = session.try_refresh_authorization().await.unwrap_err();
    assert!(matches!(err, ChatError::Network(_)), "got {err:?}");

    // The lenient variant swallows the same failure.
    session.refresh_authorization().await;
    assert!(session.access_token().is_none());
}
