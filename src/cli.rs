//! Command line interface

use crate::config::{Config, Product};
use crate::error::Result;
use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Environment variable consulted when `--user` is not given
pub const ENV_USER: &str = "ATL_USER";
/// Environment variable consulted when `--pass` is not given
pub const ENV_PASS: &str = "ATL_PASS";

/// Trigger, await and download a full Confluence or Jira backup
#[derive(Debug, Parser)]
#[command(author, version, about)]
#[command(after_help = "Exactly one of --jira or --confluence must be given.")]
#[command(group(
    ArgGroup::new("product")
        .required(true)
        .args(["jira", "confluence"])
))]
pub struct Cli {
    /// Url of the jira/confluence instance
    #[arg(long)]
    pub url: Url,

    /// Perform a backup of JIRA (cannot be combined with --confluence)
    #[arg(long)]
    pub jira: bool,

    /// Perform a backup of Confluence (cannot be combined with --jira)
    #[arg(long)]
    pub confluence: bool,

    /// User to authenticate against atlassian
    #[arg(long, env = ENV_USER)]
    pub user: String,

    /// Password to authenticate with
    #[arg(long = "pass", env = ENV_PASS, hide_env_values = true)]
    pub password: String,

    /// File to store the backup in
    #[arg(long, default_value = "./backup.zip")]
    pub file: PathBuf,

    /// Timeout wait for the backup, eg: 2h45m
    #[arg(long, default_value = "3h", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Backup attachments
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub attachments: bool,

    /// Perform a backup that can be restored in the cloud
    #[arg(
        long = "exporttocloud",
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub export_to_cloud: bool,
}

impl Cli {
    /// Selected product
    pub fn product(&self) -> Product {
        if self.jira {
            Product::Jira
        } else {
            Product::Confluence
        }
    }

    /// Build and validate the run configuration
    pub fn into_config(self) -> Result<Config> {
        let product = self.product();
        let mut config = Config::new(self.url, product, self.user, self.password);
        config.file = self.file;
        config.poll.timeout = self.timeout;
        config.attachments = self.attachments;
        config.export_to_cloud = self.export_to_cloud;
        config.validate()?;
        Ok(config)
    }
}

/// Parse a duration such as "2h45m", "90m", "30s" or "500ms".
///
/// A trailing number without a unit is read as seconds.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total = Duration::ZERO;
    let mut chars = s.chars().peekable();

    while chars.peek().is_some() {
        let mut number = String::new();
        while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
            number.push(c);
            chars.next();
        }

        let mut unit = String::new();
        while let Some(c) = chars.peek().copied().filter(char::is_ascii_alphabetic) {
            unit.push(c);
            chars.next();
        }

        if number.is_empty() {
            return Err(format!("invalid duration '{s}'"));
        }
        let value: u64 = number
            .parse()
            .map_err(|_| format!("invalid duration '{s}'"))?;

        let part = match unit.as_str() {
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "s" | "" => Duration::from_secs(value),
            "ms" => Duration::from_millis(value),
            other => return Err(format!("invalid duration unit '{other}' in '{s}'")),
        };
        total = total
            .checked_add(part)
            .ok_or_else(|| format!("duration '{s}' is too large"))?;

        if unit.is_empty() && chars.peek().is_some() {
            return Err(format!("invalid duration '{s}'"));
        }
    }

    Ok(total)
}
