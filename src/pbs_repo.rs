// OpenPBS command source: runs qstat/pbsnodes pipelines and returns raw stdout.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::instrument;

use crate::config::CommandsConfig;

/// The administrative queries one collection pass needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    JobCount,
    NodeDescription,
    JobStateCounts,
    JobDetail,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::JobCount => "job_count",
            QueryKind::NodeDescription => "node_description",
            QueryKind::JobStateCounts => "job_state_counts",
            QueryKind::JobDetail => "job_detail",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Produces the raw text of a query. No parsing happens here.
pub trait CommandSource: Send + Sync {
    fn run(&self, query: QueryKind) -> impl Future<Output = Result<String, CommandError>> + Send;
}

/// Runs each query as `<shell> -c <template>` with a hard timeout.
pub struct PbsRepo {
    shell: String,
    commands: CommandsConfig,
    timeout: Duration,
}

impl PbsRepo {
    pub fn new(shell: impl Into<String>, commands: CommandsConfig, timeout: Duration) -> Self {
        Self {
            shell: shell.into(),
            commands,
            timeout,
        }
    }

    pub fn template(&self, query: QueryKind) -> &str {
        match query {
            QueryKind::JobCount => &self.commands.job_count,
            QueryKind::NodeDescription => &self.commands.node_description,
            QueryKind::JobStateCounts => &self.commands.job_state_counts,
            QueryKind::JobDetail => &self.commands.job_detail,
        }
    }
}

impl CommandSource for PbsRepo {
    #[instrument(skip_all, fields(repo = "pbs", query = %query))]
    async fn run(&self, query: QueryKind) -> Result<String, CommandError> {
        let command = self.template(query).to_string();
        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(&command)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(CommandError::Spawn { command, source }),
            Err(_) => {
                return Err(CommandError::Timeout {
                    command,
                    timeout: self.timeout,
                });
            }
        };

        if !output.status.success() {
            return Err(CommandError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        tracing::debug!(bytes = output.stdout.len(), "query completed");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
