//! Configuration types for atl-backup

use crate::error::{Error, Result};
use crate::types::BackupRequest;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Which Atlassian product is being backed up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Product {
    /// Wiki-type product
    Confluence,
    /// Issue-tracker-type product
    Jira,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::Confluence => f.write_str("confluence"),
            Product::Jira => f.write_str("jira"),
        }
    }
}

/// Progress polling behavior
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Fixed wait before every progress request (default: 10 seconds)
    pub interval: Duration,

    /// Transient failures tolerated before giving up (default: 5)
    pub max_errors: u32,

    /// Overall time allowed for the backup to complete, measured from login (default: 3 hours)
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            max_errors: default_max_errors(),
            timeout: default_backup_timeout(),
        }
    }
}

/// HTTP client timeouts
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Timeout for login, trigger and progress calls (default: 30 seconds)
    pub request_timeout: Duration,

    /// Timeout for the archive download (default: 3 hours)
    pub download_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            download_timeout: default_download_timeout(),
        }
    }
}

/// Everything needed for one backup run
#[derive(Clone)]
pub struct Config {
    /// Base URL of the instance, e.g. `https://example.atlassian.net`
    pub url: Url,

    /// Product to back up
    pub product: Product,

    /// User to authenticate with
    pub user: String,

    /// Password to authenticate with
    pub password: String,

    /// Where the archive is written (default: "./backup.zip")
    pub file: PathBuf,

    /// Include attachments in the backup (default: true)
    pub attachments: bool,

    /// Produce a backup that can be restored in the cloud (default: true)
    pub export_to_cloud: bool,

    /// Polling behavior
    pub poll: PollConfig,

    /// HTTP client timeouts
    pub http: HttpConfig,
}

impl Config {
    /// Create a configuration with default options
    pub fn new(
        url: Url,
        product: Product,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url,
            product,
            user: user.into(),
            password: password.into(),
            file: default_output_file(),
            attachments: true,
            export_to_cloud: true,
            poll: PollConfig::default(),
            http: HttpConfig::default(),
        }
    }

    /// Check the configuration before any request is made
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(Error::config(
                "url",
                format!("unsupported url scheme '{}'", self.url.scheme()),
            ));
        }
        if self.url.host_str().is_none() {
            return Err(Error::config("url", "url has no host"));
        }
        if self.user.is_empty() {
            return Err(Error::config(
                "user",
                "please specify a user, or declare the 'ATL_USER' environment variable",
            ));
        }
        if self.password.is_empty() {
            return Err(Error::config(
                "password",
                "please specify a password, or declare the 'ATL_PASS' environment variable",
            ));
        }
        if self.file.as_os_str().is_empty() {
            return Err(Error::config("file", "output file must not be empty"));
        }
        if self.poll.max_errors == 0 {
            return Err(Error::config("poll.max_errors", "error budget must be at least 1"));
        }
        if self.poll.timeout.is_zero() {
            return Err(Error::config("timeout", "timeout must be greater than zero"));
        }
        if self.http.request_timeout.is_zero() || self.http.download_timeout.is_zero() {
            return Err(Error::config("http", "http timeouts must be greater than zero"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub fn base_url(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }

    /// The backup request described by this configuration
    pub fn backup_request(&self) -> BackupRequest {
        BackupRequest {
            product: self.product,
            include_attachments: self.attachments,
            export_to_cloud: self.export_to_cloud,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url.as_str())
            .field("product", &self.product)
            .field("user", &self.user)
            .field("password", &"********")
            .field("file", &self.file)
            .field("attachments", &self.attachments)
            .field("export_to_cloud", &self.export_to_cloud)
            .field("poll", &self.poll)
            .field("http", &self.http)
            .finish()
    }
}

fn default_output_file() -> PathBuf {
    PathBuf::from("./backup.zip")
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_max_errors() -> u32 {
    5
}

fn default_backup_timeout() -> Duration {
    Duration::from_secs(3 * 60 * 60)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_download_timeout() -> Duration {
    Duration::from_secs(3 * 60 * 60)
}
