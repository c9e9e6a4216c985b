use std::time::Duration;

use tracing::info;

use crate::error::{Result, SeedError};

/// Fetch one HTML page. Single attempt: re-running the command is the retry policy.
pub async fn fetch_html(url: &str, user_agent: &str, timeout: Duration) -> Result<String> {
    let network = |source: Box<dyn std::error::Error + Send + Sync>| SeedError::Network {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| network(e.into()))?;

    info!("Fetching {}", url);
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| network(e.into()))?
        .bytes()
        .await
        .map_err(|e| network(e.into()))?;

    // The page is served as UTF-8; anything else means a corrupted response.
    let html = String::from_utf8(body.to_vec()).map_err(|e| network(e.into()))?;

    info!("Fetched {} bytes", html.len());
    Ok(html)
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    /// Answer a single request with `response` and return the URL to hit.
    fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response);
                let _ = stream.flush();
            }
        });
        format!("http://127.0.0.1:{}/", port)
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}/", port);

        let err = fetch_html(&url, "test-agent", Duration::from_secs(2))
            .await
            .unwrap_err();
        match err {
            SeedError::Network { url: u, .. } => assert_eq!(u, url),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn returns_utf8_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: 23\r\nConnection: close\r\n\r\n<html>Роллы</html>"
                .as_bytes(),
        );
        let html = fetch_html(&url, "test-agent", Duration::from_secs(5)).await.unwrap();
        assert_eq!(html, "<html>Роллы</html>");
    }

    #[tokio::test]
    async fn invalid_utf8_body_is_network_error() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 16\r\nConnection: close\r\n\r\n<html>\xff\xfe\xc3</html>",
        );
        let err = fetch_html(&url, "test-agent", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Network { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn error_status_is_network_error() {
        let url = serve_once(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let err = fetch_html(&url, "test-agent", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Network { .. }), "got {err:?}");
    }
}
