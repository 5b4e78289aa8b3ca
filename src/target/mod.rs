//! Product-specific backup endpoints
//!
//! Confluence and Jira expose the same backup workflow behind different
//! endpoints and progress encodings. Each product is a [`BackupTarget`]:
//!
//! - [`WikiTarget`]: Confluence, one progress request carrying the file name
//! - [`TrackerTarget`]: Jira, a last-task-id lookup followed by a progress
//!   request whose result is a JSON document embedded in a string field

mod tracker;
mod traits;
mod wiki;

pub use tracker::TrackerTarget;
pub use traits::BackupTarget;
pub use wiki::WikiTarget;

use crate::config::Product;
use crate::error::{Error, Result};
use crate::session::{Session, body_text};
use reqwest::{Method, Response, StatusCode};

/// The target implementation for a product
pub fn target_for(product: Product) -> Box<dyn BackupTarget> {
    match product {
        Product::Confluence => Box::new(WikiTarget),
        Product::Jira => Box::new(TrackerTarget),
    }
}

/// Append a `_=<unix seconds>` query parameter so intermediaries never
/// serve a cached progress response.
pub(crate) fn cache_busted(path: &str) -> String {
    format!("{}?_={}", path, chrono::Utc::now().timestamp())
}

/// GET a progress resource and insist on HTTP 200
pub(crate) async fn get_progress_resource(
    session: &Session,
    path: &str,
    operation: &str,
) -> Result<Response> {
    let response = session
        .request(Method::GET, &cache_busted(path), None, false)
        .await?;

    if response.status() != StatusCode::OK {
        let status = response.status().as_u16();
        return Err(Error::UnexpectedStatus {
            operation: operation.to_string(),
            status,
            body: body_text(response).await,
        });
    }

    Ok(response)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_for_product() {
        assert_eq!(target_for(Product::Confluence).name(), "confluence");
        assert_eq!(target_for(Product::Jira).name(), "jira");
    }

    #[test]
    fn test_cache_busted_appends_timestamp() {
        let busted = cache_busted("/wiki/rest/obm/1.0/getprogress.json");
        let (path, query) = busted.split_once('?').unwrap();
        assert_eq!(path, "/wiki/rest/obm/1.0/getprogress.json");

        let stamp: i64 = query.strip_prefix("_=").unwrap().parse().unwrap();
        let now = chrono::Utc::now().timestamp();
        assert!((now - stamp).abs() <= 5);
    }
}
