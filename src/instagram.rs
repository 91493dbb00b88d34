//! Direct checks against public Instagram profile pages.

use crate::CollectorError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PROFILE_BASE_URL: &str = "https://www.instagram.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const NOT_AVAILABLE: &str = "Sorry, this page isn't available.";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Image URL that redirects to the account's current profile picture.
pub fn fallback_profile_image(handle: &str) -> String {
    format!("{}/{}/picture/", DEFAULT_PROFILE_BASE_URL, handle)
}

/// Whether a fetched profile page belongs to an existing account.
pub fn page_exists(status: StatusCode, body: &str) -> bool {
    status == StatusCode::OK && !body.contains(NOT_AVAILABLE)
}

#[async_trait::async_trait]
pub trait ProfileChecker {
    async fn profile_exists(&self, handle: &str) -> Result<bool, CollectorError>;
}

pub struct InstagramChecker {
    client: Client,
    base_url: String,
}

impl InstagramChecker {
    pub fn new(base_url: &str) -> Result<InstagramChecker, CollectorError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(InstagramChecker {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ProfileChecker for InstagramChecker {
    async fn profile_exists(&self, handle: &str) -> Result<bool, CollectorError> {
        let url = format!("{}/{}/", self.base_url, handle);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(page_exists(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    #[test]
    fn missing_pages() {
        assert!(page_exists(StatusCode::OK, "<html>Twig and Cotton</html>"));
        assert!(!page_exists(StatusCode::NOT_FOUND, "<html></html>"));
        assert!(!page_exists(
            StatusCode::OK,
            "<h2>Sorry, this page isn't available.</h2>"
        ));
        assert!(!page_exists(StatusCode::FOUND, ""));
    }

    #[test]
    fn fallback_image_url() {
        assert_eq!(
            fallback_profile_image("twigandcotton"),
            "https://www.instagram.com/twigandcotton/picture/"
        );
    }

    /// Answers one request per connection, with a body picked by path.
    async fn serve_profiles() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0; 4096];
                let n = socket.read(&mut buf).await.unwrap();
                let request = String::from_utf8_lossy(&buf[..n]);
                let (status, body) = if request.starts_with("GET /realvendor/ ") {
                    ("200 OK", "<title>Real Vendor</title>")
                } else if request.starts_with("GET /gonevendor/ ") {
                    ("200 OK", "Sorry, this page isn't available.")
                } else {
                    ("404 Not Found", "")
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn checks_profile_pages() {
        let checker = InstagramChecker::new(&serve_profiles().await).unwrap();
        assert!(checker.profile_exists("realvendor").await.unwrap());
        assert!(!checker.profile_exists("gonevendor").await.unwrap());
        assert!(!checker.profile_exists("nobody").await.unwrap());
    }
}
