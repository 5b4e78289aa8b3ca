//! Jira backup endpoints
//!
//! Jira reports progress per task. Every poll first asks for the id of the
//! most recent export task, then reads that task's progress. Once the task
//! status is `Success`, its `Result` field holds a second JSON document (as a
//! string) naming the media file id and file name of the archive.

use super::{BackupTarget, get_progress_resource};
use crate::error::{Error, Result};
use crate::session::{Session, body_text};
use crate::types::ProgressSnapshot;
use async_trait::async_trait;
use serde::Deserialize;

const TRIGGER_PATH: &str = "/rest/backup/1/export/runbackup";
const LAST_TASK_PATH: &str = "/rest/backup/1/export/lastTaskId";
const PROGRESS_PATH: &str = "/rest/internal/2/task/progress";
const DOWNLOAD_PATH: &str = "/plugins/servlet/export/download";

const SUCCESS_STATUS: &str = "Success";

/// Jira (issue-tracker-type) backup target
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackerTarget;

/// Outer task progress envelope
#[derive(Debug, Deserialize)]
struct TaskProgress {
    #[serde(rename = "Status", alias = "status", default)]
    status: Option<String>,
    #[serde(rename = "Progress", alias = "progress", default)]
    progress: Option<i64>,
    #[serde(rename = "Description", alias = "description", default)]
    description: Option<String>,
    #[serde(rename = "Result", alias = "result", default)]
    result: Option<String>,
}

/// Document embedded in [`TaskProgress::result`]
#[derive(Debug, Deserialize)]
struct TaskResult {
    #[serde(rename = "MediaFileId", alias = "mediaFileId")]
    media_file_id: String,
    #[serde(rename = "FileName", alias = "fileName")]
    file_name: String,
}

impl TrackerTarget {
    /// Decode a task progress response.
    ///
    /// Only a `Success` status carries a file identifier, built as
    /// `<MediaFileId>/<FileName>` from the embedded result document.
    pub fn decode_progress(body: &[u8]) -> Result<ProgressSnapshot> {
        let progress: TaskProgress = serde_json::from_slice(body)?;
        let status = progress.status.unwrap_or_default();

        if let Some(description) = progress.description.as_deref() {
            tracing::debug!(description, "task description");
        }

        let file_id = if status == SUCCESS_STATUS {
            Some(decode_result(progress.result.as_deref())?)
        } else {
            None
        };

        Ok(ProgressSnapshot {
            status,
            progress: progress
                .progress
                .map(|pct| format!("{pct}%"))
                .unwrap_or_default(),
            file_id,
            concurrent_backup: false,
        })
    }

    /// Extract the task id from a `lastTaskId` response body.
    ///
    /// Accepts a bare token, a JSON string or a JSON number.
    pub fn parse_task_id(body: &str) -> Result<String> {
        let raw = body.trim();
        let id = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::String(id)) => id.trim().to_string(),
            Ok(serde_json::Value::Number(id)) => id.to_string(),
            _ => raw.to_string(),
        };

        if id.is_empty() {
            return Err(Error::InvalidResponse("empty last task id".into()));
        }
        if id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
            return Err(Error::InvalidResponse(format!("malformed last task id: {id}")));
        }
        Ok(id)
    }
}

/// Second decoding stage: the result string is a JSON document of its own
fn decode_result(raw: Option<&str>) -> Result<String> {
    let raw = raw.filter(|r| !r.trim().is_empty()).ok_or_else(|| {
        Error::InvalidResponse("task reported success without a result".into())
    })?;

    let result: TaskResult = serde_json::from_str(raw)?;
    if result.media_file_id.is_empty() || result.file_name.is_empty() {
        return Err(Error::InvalidResponse(format!(
            "incomplete task result: {raw}"
        )));
    }

    Ok(format!("{}/{}", result.media_file_id, result.file_name))
}

#[async_trait]
impl BackupTarget for TrackerTarget {
    fn name(&self) -> &'static str {
        "jira"
    }

    fn trigger_path(&self) -> &'static str {
        TRIGGER_PATH
    }

    fn download_path(&self, file_id: &str) -> String {
        format!("{DOWNLOAD_PATH}/{file_id}")
    }

    async fn fetch_progress(&self, session: &Session) -> Result<ProgressSnapshot> {
        // The id is looked up on every poll so a newer export task is picked up
        let response =
            get_progress_resource(session, LAST_TASK_PATH, "fetch last task id").await?;
        let task_id = Self::parse_task_id(&body_text(response).await)?;
        tracing::debug!(task_id = %task_id, "last export task");

        let progress_path = format!("{PROGRESS_PATH}/{task_id}");
        let response =
            get_progress_resource(session, &progress_path, "retrieve backup progress").await?;
        let body = response.bytes().await?;
        Self::decode_progress(&body)
    }
}
