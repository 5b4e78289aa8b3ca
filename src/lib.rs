//! # atl-backup
//!
//! Trigger, await and download a full backup of a Confluence or Jira instance.
//!
//! A run is strictly sequential:
//!
//! 1. [`Session::login`] authenticates and keeps the session cookie
//! 2. [`trigger_backup`] asks the server to start a backup
//! 3. [`Poller::wait_for_file`] polls progress until the archive is ready
//! 4. [`download_backup`] streams the archive to disk
//!
//! The product-specific parts (endpoints, progress encodings) live behind the
//! [`BackupTarget`] trait, implemented by [`WikiTarget`] and [`TrackerTarget`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use atl_backup::{Config, Product, run_backup};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new(
//!         "https://example.atlassian.net".parse()?,
//!         Product::Confluence,
//!         "admin",
//!         "secret",
//!     );
//!
//!     let result = run_backup(config).await?;
//!     println!("{} bytes written to {}", result.bytes_written, result.path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Command line interface
pub mod cli;
/// Configuration types
pub mod config;
/// Archive download
pub mod download;
/// Error types
pub mod error;
/// Progress polling
pub mod poller;
/// Authenticated HTTP session
pub mod session;
/// Product-specific backup endpoints
pub mod target;
/// Starting a backup on the server
pub mod trigger;
/// Core types
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, HttpConfig, PollConfig, Product};
pub use download::download_backup;
pub use error::{DownloadError, Error, PollError, Result, ToExitCode};
pub use poller::Poller;
pub use session::Session;
pub use target::{BackupTarget, TrackerTarget, WikiTarget, target_for};
pub use trigger::trigger_backup;
pub use types::{BackupRequest, DownloadResult, ProgressSnapshot};

/// Run one complete backup: login, trigger, poll, download.
///
/// Returns as soon as any step fails; nothing is retried here apart from the
/// poller's own transient-error handling.
pub async fn run_backup(config: Config) -> Result<DownloadResult> {
    config.validate()?;

    let mut session = Session::login(&config).await?;
    let target = target_for(config.product);

    trigger_backup(&session, target.as_ref(), &config.backup_request()).await?;

    let file_id = Poller::new(target.as_ref(), &config.poll)
        .wait_for_file(&mut session)
        .await?;

    download_backup(&session, target.as_ref(), &file_id, &config.file).await
}
