//! One-shot HTTP server that records the request it receives.

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

#[derive(Debug)]
pub struct CapturedRequest {
    /// e.g. `GET /forecast/KEY/1,2?units=si HTTP/1.1`
    pub request_line: String,
    pub body: String,
}

impl CapturedRequest {
    /// Request target with `%2C` decoded back to `,`.
    pub fn target(&self) -> String {
        self.request_line
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .replace("%2C", ",")
    }
}

/// Serve a single request, answering with `status` and `body`.
///
/// Returns the base URL and a handle resolving to the captured request.
pub async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        CapturedRequest {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
        }
    });

    (base_url, handle)
}
