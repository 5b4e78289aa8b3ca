//! atl-backup - back up a Confluence or Jira instance from the command line

use atl_backup::ToExitCode;
use atl_backup::cli::Cli;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn,hyper=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => return fail(e),
    };

    match atl_backup::run_backup(config).await {
        Ok(result) => {
            tracing::info!(
                path = %result.path.display(),
                bytes = result.bytes_written,
                "backup complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn fail(error: atl_backup::Error) -> ExitCode {
    tracing::error!(code = error.error_code(), "{error}");
    ExitCode::from(error.exit_code())
}
