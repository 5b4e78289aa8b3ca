//! Authenticated HTTP session
//!
//! A [`Session`] wraps two `reqwest` clients that share one cookie jar: a
//! control client with a short timeout for login, trigger and progress calls,
//! and a download client with a long timeout for the archive itself. The
//! session cookie obtained by [`Session::login`] is replayed by both.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Login endpoint shared by both products
pub const LOGIN_PATH: &str = "/rest/auth/1/session";

/// Authenticated client state for one backup run
pub struct Session {
    base_url: String,
    client: reqwest::Client,
    downloader: reqwest::Client,
    started_at: Instant,
    errors: u32,
}

impl Session {
    /// Log in with the configured credentials.
    ///
    /// Only HTTP 200 counts as success; the response body is ignored.
    pub async fn login(config: &Config) -> Result<Self> {
        let session = Self::new(config)?;

        let body = serde_json::json!({
            "username": config.user,
            "password": config.password,
        })
        .to_string();

        let response = session
            .request(Method::POST, LOGIN_PATH, Some(body), false)
            .await?;

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            tracing::error!(status, user = %config.user, "unable to login");
            return Err(Error::Auth { status });
        }

        tracing::info!(user = %config.user, "login successful");
        Ok(session)
    }

    pub(crate) fn new(config: &Config) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        Ok(Self {
            base_url: config.base_url(),
            client: build_client(&jar, config.http.request_timeout)?,
            downloader: build_client(&jar, config.http.download_timeout)?,
            started_at: Instant::now(),
            errors: 0,
        })
    }

    /// Send a request to `path` relative to the instance base URL.
    ///
    /// `long_timeout` selects the download client. The response status is
    /// not inspected; callers decide what counts as success.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        long_timeout: bool,
    ) -> Result<Response> {
        let url = self.url(path);
        tracing::info!(method = %method, url = %url, "performing request");

        let client = if long_timeout {
            &self.downloader
        } else {
            &self.client
        };

        let mut request = client.request(method, &url);
        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }

    /// Absolute URL for a path on this instance
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Transient failures recorded so far
    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Count one transient failure against the error budget
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Time since the session was created
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

fn build_client(jar: &Arc<Jar>, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_provider(Arc::clone(jar))
        .default_headers(default_headers())
        .timeout(timeout)
        .build()
        .map_err(Error::Network)
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-atlassian-token"),
        HeaderValue::from_static("no-check"),
    );
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers
}

/// Response body as text, empty if it cannot be read
pub(crate) async fn body_text(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Product;
    use crate::test_helpers::test_config;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_sends_credentials_and_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(header("content-type", "application/json"))
            .and(header("accept", "application/json"))
            .and(header("x-atlassian-token", "no-check"))
            .and(header("x-requested-with", "XMLHttpRequest"))
            .and(body_json(serde_json::json!({"username": "u", "password": "p"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(&server.uri(), Product::Confluence);
        let session = Session::login(&config).await.unwrap();
        assert_eq!(session.errors(), 0);
    }

    #[tokio::test]
    async fn test_login_escapes_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(body_json(
                serde_json::json!({"username": "u", "password": "p\"w\\d"}),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = test_config(&server.uri(), Product::Confluence);
        config.password = "p\"w\\d".into();
        Session::login(&config).await.unwrap();
    }

    #[tokio::test]
    async fn test_login_ignores_response_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let config = test_config(&server.uri(), Product::Jira);
        assert!(Session::login(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_requires_status_200() {
        for status in [201u16, 204, 401, 403, 500] {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path(LOGIN_PATH))
                .respond_with(
                    ResponseTemplate::new(status).set_body_json(serde_json::json!({"ok": true})),
                )
                .mount(&server)
                .await;

            let config = test_config(&server.uri(), Product::Confluence);
            match Session::login(&config).await {
                Err(Error::Auth { status: got }) => assert_eq!(got, status),
                Err(other) => panic!("Expected Auth error for {status}, got {other:?}"),
                Ok(_) => panic!("Expected Auth error for {status}, got a session"),
            }
        }
    }

    #[tokio::test]
    async fn test_session_cookie_is_replayed_on_both_clients() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=abc123; Path=/"),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/probe"))
            .and(header("cookie", "JSESSIONID=abc123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let config = test_config(&server.uri(), Product::Confluence);
        let session = Session::login(&config).await.unwrap();

        let control = session
            .request(Method::GET, "/probe", None, false)
            .await
            .unwrap();
        assert_eq!(control.status(), StatusCode::OK);

        let download = session
            .request(Method::GET, "/probe", None, true)
            .await
            .unwrap();
        assert_eq!(download.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_url_joins_base_with_trailing_slash() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(&format!("{}/", server.uri()), Product::Confluence);
        let session = Session::login(&config).await.unwrap();
        assert_eq!(
            session.url("/wiki/download/x.zip"),
            format!("{}/wiki/download/x.zip", server.uri())
        );
    }

    #[tokio::test]
    async fn test_login_connection_refused() {
        // Port 9 is the discard service, rarely running on modern systems
        let config = test_config("http://127.0.0.1:9", Product::Confluence);
        let result = Session::login(&config).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }

    #[tokio::test]
    async fn test_error_counter() {
        let config = test_config("http://127.0.0.1:9", Product::Jira);
        let mut session = Session::new(&config).unwrap();
        assert_eq!(session.errors(), 0);
        session.record_error();
        session.record_error();
        assert_eq!(session.errors(), 2);
        assert!(session.elapsed() < Duration::from_secs(60));
    }
}
