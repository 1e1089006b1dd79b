use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::options::{Options, UsageError};

mod args;
mod auth;
mod error;
mod options;
mod upload;

/// Exit status for a rejected invocation.
const USAGE_EXIT: i32 = 2;

fn init_tracing() -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opts = match Options::from_env() {
        Ok(opts) => opts,
        Err(UsageError::Help(usage)) => {
            print!("{usage}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            eprint!("{}", args::usage(&args::command_name()));
            std::process::exit(USAGE_EXIT);
        }
    };

    init_tracing()?;

    let hub = auth::resolve(&opts)
        .await
        .context("cannot authenticate with service account")?;

    upload::upload(&opts, &hub)
        .await
        .with_context(|| format!("cannot upload {:?}", opts.file_path()))?;

    Ok(())
}
