//! Common test utilities for atl-backup end-to-end tests

use atl_backup::cli::Cli;
use atl_backup::{Config, Product};
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session cookie handed out by [`mount_login`]
pub const SESSION_COOKIE: &str = "JSESSIONID=e2e-session";

/// Mount a login endpoint that answers 200 and sets [`SESSION_COOKIE`]
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rest/auth/1/session"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{SESSION_COOKIE}; Path=/").as_str()),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Build a configuration the way the binary does, from command line flags,
/// then shorten the poll interval so tests run quickly.
pub fn config_from_flags(server: &MockServer, product: Product, file: &Path) -> Config {
    let product_flag = match product {
        Product::Confluence => "--confluence",
        Product::Jira => "--jira",
    };

    let cli = Cli::try_parse_from([
        "atl-backup".to_string(),
        product_flag.to_string(),
        format!("--url={}", server.uri()),
        "--user=u".to_string(),
        "--pass=p".to_string(),
        format!("--file={}", file.display()),
    ])
    .expect("valid flags");

    let mut config = cli.into_config().expect("valid config");
    config.poll.interval = Duration::from_millis(10);
    config
}
