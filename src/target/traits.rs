//! The backup target abstraction

use crate::error::Result;
use crate::session::Session;
use crate::types::ProgressSnapshot;
use async_trait::async_trait;

/// Product-specific half of a backup run
///
/// The session, poller and downloader are shared by every product; a
/// `BackupTarget` supplies only what differs between them: where the backup
/// is started, how progress is read and decoded, and where the finished
/// archive lives.
///
/// # Examples
///
/// ```no_run
/// use atl_backup::config::{Config, Product};
/// use atl_backup::session::Session;
/// use atl_backup::target::target_for;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::new(
///     "https://example.atlassian.net".parse()?,
///     Product::Confluence,
///     "admin",
///     "secret",
/// );
/// let session = Session::login(&config).await?;
/// let target = target_for(config.product);
///
/// let snapshot = target.fetch_progress(&session).await?;
/// println!("{}: {}", snapshot.status, snapshot.progress);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait BackupTarget: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Path of the start-backup endpoint
    fn trigger_path(&self) -> &'static str;

    /// Path the finished archive is downloaded from
    fn download_path(&self, file_id: &str) -> String;

    /// Read the current backup progress.
    ///
    /// Any error is a transient failure from the poller's point of view:
    /// transport errors, unexpected statuses and undecodable bodies alike.
    async fn fetch_progress(&self, session: &Session) -> Result<ProgressSnapshot>;
}
