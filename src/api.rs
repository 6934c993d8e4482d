//! TV show catalog client

use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::Movie;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce the show collection for a source URL.
///
/// Implementations block; the loader calls them from a worker thread.
pub trait MovieSource: Send + Sync {
    fn fetch_movies(&self, url: &str) -> Result<Vec<Movie>, FetchError>;
}

/// HTTP client for the collection endpoint
pub struct ShowsClient {
    agent: ureq::Agent,
    user_agent: String,
}

impl ShowsClient {
    pub fn new(config: &AppConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.read_timeout_secs)))
            .timeout_connect(Some(Duration::from_secs(config.connect_timeout_secs)))
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self {
            agent,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl MovieSource for ShowsClient {
    fn fetch_movies(&self, url: &str) -> Result<Vec<Movie>, FetchError> {
        let mut response = self
            .agent
            .get(url.trim())
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.body_mut().read_to_string()?;
        let movies: Vec<Movie> = serde_json::from_str(&body)?;
        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one canned HTTP response on a local port
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        });

        format!("http://{}/shows", addr)
    }

    #[test]
    fn test_server_error_status() {
        let url = serve_once("500 Internal Server Error", "");
        let client = ShowsClient::new(&AppConfig::default());

        let err = client.fetch_movies(&url).unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
        assert_eq!(err.to_string(), "HTTP error: 500");
    }

    #[test]
    fn test_fetch_decodes_collection() {
        let url = serve_once(
            "200 OK",
            r#"[{"id":1,"name":"Under the Dome","language":"English","genres":["Drama"],"status":"Ended","rating":{"average":6.5}},
                {"id":2,"name":"Person of Interest","genres":[],"status":"Running","rating":{"average":null}}]"#,
        );
        let client = ShowsClient::new(&AppConfig::default());

        let movies = client.fetch_movies(&url).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].name, "Under the Dome");
        assert_eq!(movies[1].rating.average, None);
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let url = serve_once("200 OK", r#"{"not": "a list"}"#);
        let client = ShowsClient::new(&AppConfig::default());

        let err = client.fetch_movies(&url).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = ShowsClient::new(&AppConfig::default());

        let err = client.fetch_movies(&format!("http://{}/shows", addr)).unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert!(err.to_string().starts_with("Request failed:"));
    }
}
