//! Wait command - the container startup gate

use std::time::Duration;

use clap::Args;
use tracing::error;

use crate::infrastructure::gate::{
    parse_duration, parse_target, run_gated, ExecLauncher, GateCommand, RetryPolicy, WaitTarget,
};

#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Endpoint to wait for, e.g. `tcp://postgres:5432`; repeatable
    #[arg(long = "wait", value_name = "TARGET", required = true, value_parser = parse_target)]
    pub targets: Vec<WaitTarget>,

    /// Give up once this much time has passed
    #[arg(long, default_value = "10s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Sleep after the first failed attempt; doubles up to --max-interval
    #[arg(long, default_value = "100ms", value_parser = parse_duration)]
    pub retry_interval: Duration,

    #[arg(long, default_value = "2s", value_parser = parse_duration)]
    pub max_interval: Duration,

    /// Command to run once every target is reachable
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl WaitArgs {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_timeout(self.timeout)
            .with_initial_interval(self.retry_interval)
            .with_max_interval(self.max_interval.max(self.retry_interval))
    }
}

/// Blocks until the targets accept connections, then execs the command.
/// Returns an error (and so a nonzero exit) without running it on timeout.
pub async fn run(args: WaitArgs) -> anyhow::Result<()> {
    super::bootstrap();

    let command = GateCommand::from_argv(args.command.clone())?;

    match run_gated(&args.targets, &args.policy(), &command, &ExecLauncher).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!(error = %e, "Startup gate failed");
            Err(e.into())
        }
    }
}
