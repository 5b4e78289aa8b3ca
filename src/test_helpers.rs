//! Shared test helpers for mock-server based tests.

use crate::config::{Config, Product};
use crate::session::{LOGIN_PATH, Session};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Configuration pointing at `base_url` with a poll interval short enough for tests.
pub(crate) fn test_config(base_url: &str, product: Product) -> Config {
    let mut config = Config::new(base_url.parse().unwrap(), product, "u", "p");
    config.poll.interval = Duration::from_millis(10);
    config
}

/// Mount a login endpoint answering 200 and return a logged-in session.
pub(crate) async fn logged_in_session(server: &MockServer, product: Product) -> Session {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    Session::login(&test_config(&server.uri(), product))
        .await
        .unwrap()
}

/// Matches requests carrying a numeric `_` cache-busting query parameter.
#[derive(Debug)]
pub(crate) struct HasCacheBuster;

impl Match for HasCacheBuster {
    fn matches(&self, request: &Request) -> bool {
        request
            .url
            .query_pairs()
            .any(|(key, value)| key == "_" && value.parse::<i64>().is_ok())
    }
}
