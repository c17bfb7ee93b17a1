//! CLI argument definitions and the interactive front end.

mod command;
mod repl;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;

pub use command::Command;
pub use repl::Repl;

use crate::exec::WorkloadSpec;
use crate::runtime::{ContainerRegistry, DEFAULT_CAPACITY, RuntimeConfig, ShutdownPolicy};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// cask - minimal container supervisor
///
/// Reads commands from standard input, one per line.
#[derive(Parser, Debug)]
#[command(name = "cask")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Maximum number of containers
    #[arg(long, env = "CASK_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Program each container runs
    #[arg(long, env = "CASK_WORKLOAD", default_value = "sleep")]
    pub workload: String,

    /// Arguments for the workload program (repeatable).
    ///
    /// With none given, the default `sleep` workload runs `sleep infinity`
    /// and any other program runs without arguments.
    #[arg(long = "workload-arg")]
    pub workload_args: Vec<String>,

    /// Also terminate stopped containers on exit
    #[arg(long, env = "CASK_REAP_STOPPED")]
    pub reap_stopped: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Build the runtime configuration from the arguments.
    pub fn runtime_config(&self) -> RuntimeConfig {
        let policy = if self.reap_stopped {
            ShutdownPolicy::All
        } else {
            ShutdownPolicy::RunningOnly
        };

        RuntimeConfig::default()
            .with_capacity(self.capacity)
            .with_workload(self.workload_spec())
            .with_shutdown_policy(policy)
    }

    fn workload_spec(&self) -> WorkloadSpec {
        if self.workload_args.is_empty() && self.workload == WorkloadSpec::default().program {
            return WorkloadSpec::default();
        }
        WorkloadSpec::new(&self.workload, &self.workload_args)
    }

    /// Run the interactive loop over standard input and output.
    pub async fn execute(self) -> Result<()> {
        let config = self.runtime_config();
        tracing::debug!(?config, "Starting supervisor");

        let registry = ContainerRegistry::new(config);
        let mut events = registry.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => match serde_json::to_string(&event) {
                        Ok(json) => tracing::debug!(event = %json, "Runtime event"),
                        Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event logger lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let input = BufReader::new(tokio::io::stdin());
        let report = Repl::new(registry, std::io::stdout()).run(input).await?;

        if !report.left_stopped.is_empty() {
            tracing::warn!(
                containers = ?report.left_stopped,
                "Stopped containers were not terminated; pass --reap-stopped to clean them up"
            );
        }
        if !report.failed.is_empty() {
            return Err(color_eyre::eyre::eyre!(
                "Failed to terminate containers: {:?}",
                report.failed
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arguments() {
        let cli = Cli::try_parse_from(["cask"]).unwrap();
        let config = cli.runtime_config();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.workload, WorkloadSpec::default());
        assert_eq!(config.shutdown_policy, ShutdownPolicy::RunningOnly);
    }

    #[test]
    fn custom_arguments() {
        let cli = Cli::try_parse_from([
            "cask",
            "--capacity",
            "3",
            "--workload",
            "sleep",
            "--workload-arg",
            "60",
            "--reap-stopped",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);

        let config = cli.runtime_config();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.workload.args, vec!["60".to_string()]);
        assert_eq!(config.shutdown_policy, ShutdownPolicy::All);
    }

    #[test]
    fn other_workloads_get_no_default_arguments() {
        let cli = Cli::try_parse_from(["cask", "--workload", "true"]).unwrap();
        let config = cli.runtime_config();
        assert_eq!(config.workload.program, "true");
        assert!(config.workload.args.is_empty());

        let cli = Cli::try_parse_from(["cask", "--workload", "sleep"]).unwrap();
        assert_eq!(cli.runtime_config().workload.args, vec!["infinity".to_string()]);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
