//! Starting a backup on the server

use crate::error::{Error, Result};
use crate::session::{Session, body_text};
use crate::target::BackupTarget;
use crate::types::BackupRequest;
use reqwest::{Method, StatusCode};

/// Ask the server to start a backup.
///
/// Returns the raw acknowledgment body. Anything but HTTP 200 is fatal.
pub async fn trigger_backup(
    session: &Session,
    target: &dyn BackupTarget,
    request: &BackupRequest,
) -> Result<String> {
    let response = session
        .request(
            Method::POST,
            target.trigger_path(),
            Some(request.body()),
            false,
        )
        .await?;

    let status = response.status();
    let body = body_text(response).await;

    if status != StatusCode::OK {
        tracing::error!(status = status.as_u16(), body = %body, "unable to trigger backup");
        return Err(Error::UnexpectedStatus {
            operation: "trigger backup".to_string(),
            status: status.as_u16(),
            body,
        });
    }

    tracing::info!(product = target.name(), response = %body, "successfully started backup process");
    Ok(body)
}
