//! Progress polling
//!
//! The backup runs as a long synchronous job on the server with no
//! completion callback, so the poller asks for progress on a fixed interval
//! until the target reports a file identifier.
//!
//! Two ceilings bound the loop, both checked at the top of every iteration
//! before the wait:
//! - the error budget: transient failures recorded on the [`Session`]
//! - the overall timeout, measured from login
//!
//! Transport errors, unexpected statuses and undecodable bodies all count
//! against the same budget. A failed poll is simply retried after the next
//! wait.

use crate::config::PollConfig;
use crate::error::{PollError, Result};
use crate::session::Session;
use crate::target::BackupTarget;

/// Waits for a server-side backup to produce its archive
pub struct Poller<'a> {
    target: &'a dyn BackupTarget,
    config: &'a PollConfig,
}

impl<'a> Poller<'a> {
    /// Create a poller for `target`
    pub fn new(target: &'a dyn BackupTarget, config: &'a PollConfig) -> Self {
        Self { target, config }
    }

    /// Poll until a file identifier is available.
    ///
    /// Every iteration waits once before asking, so the first progress request
    /// goes out one interval after this call.
    pub async fn wait_for_file(&self, session: &mut Session) -> Result<String> {
        loop {
            self.check_limits(session)?;

            tokio::time::sleep(self.config.interval).await;

            let snapshot = match self.target.fetch_progress(session).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    session.record_error();
                    tracing::warn!(
                        product = self.target.name(),
                        errors = session.errors(),
                        error = %e,
                        "error retrieving backup progress"
                    );
                    continue;
                }
            };

            tracing::info!(
                status = %snapshot.status,
                progress = %snapshot.progress,
                "progress update"
            );

            if snapshot.concurrent_backup {
                tracing::warn!("server reports another backup in progress");
            }

            if let Some(file_id) = snapshot.file_id {
                tracing::info!(file_id = %file_id, "backup task completed");
                return Ok(file_id);
            }
        }
    }

    fn check_limits(&self, session: &Session) -> std::result::Result<(), PollError> {
        if session.errors() >= self.config.max_errors {
            return Err(PollError::TooManyErrors {
                errors: session.errors(),
                limit: self.config.max_errors,
            });
        }

        let elapsed = session.elapsed();
        if elapsed >= self.config.timeout {
            return Err(PollError::TimedOut {
                elapsed,
                limit: self.config.timeout,
            });
        }

        Ok(())
    }
}
