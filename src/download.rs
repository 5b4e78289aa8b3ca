//! Archive download

use crate::error::{DownloadError, Result};
use crate::session::Session;
use crate::target::BackupTarget;
use crate::types::DownloadResult;
use reqwest::{Method, Response, StatusCode};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Download the finished archive `file_id` to `destination`.
///
/// Uses the long-timeout client and streams the body straight to disk. An
/// existing file at `destination` is overwritten. If the transfer fails
/// midway, the partial file is removed again.
pub async fn download_backup(
    session: &Session,
    target: &dyn BackupTarget,
    file_id: &str,
    destination: &Path,
) -> Result<DownloadResult> {
    let download_path = target.download_path(file_id);

    tracing::info!(file_id = %file_id, "starting download, this might take some time");
    let mut response = session
        .request(Method::GET, &download_path, None, true)
        .await?;

    if response.status() != StatusCode::OK {
        return Err(DownloadError::Status {
            status: response.status().as_u16(),
            url: session.url(&download_path),
        }
        .into());
    }

    let mut file = File::create(destination)
        .await
        .map_err(|source| DownloadError::CreateFile {
            path: destination.to_path_buf(),
            source,
        })?;

    let bytes_written = match stream_body(&mut response, &mut file, destination).await {
        Ok(bytes_written) => bytes_written,
        Err(e) => {
            drop(file);
            discard_partial_file(destination).await;
            return Err(e);
        }
    };

    tracing::info!(
        path = %destination.display(),
        bytes = bytes_written,
        "successfully downloaded backup"
    );

    Ok(DownloadResult {
        path: destination.to_path_buf(),
        bytes_written,
    })
}

async fn stream_body(response: &mut Response, file: &mut File, path: &Path) -> Result<u64> {
    let write_error = |source| DownloadError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes_written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await.map_err(write_error)?;
        bytes_written += chunk.len() as u64;
    }
    file.flush().await.map_err(write_error)?;

    Ok(bytes_written)
}

/// Remove a partially written archive
async fn discard_partial_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove partial download");
    } else {
        tracing::warn!(path = %path.display(), "removed partial download");
    }
}
