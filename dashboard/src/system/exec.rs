use std::time::Duration;

use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

use crate::system::cluster::{ClusterApi, ClusterError};

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to create executor: {0}")]
    Setup(#[source] ClusterError),

    #[error("failed to stream command execution: {cause} (stderr: {stderr})")]
    Stream { cause: String, stderr: String },

    #[error("command did not finish within {0:?}")]
    Timeout(Duration),
}

/// Runs `command` inside `workload` and returns its stdout. Stderr is only
/// kept when the command fails. No retries.
pub async fn execute(
    cluster: &dyn ClusterApi,
    workload: &str,
    namespace: &str,
    command: &[String],
    deadline: Duration,
) -> Result<String, ExecError> {
    debug!(%workload, %namespace, ?command, "opening exec stream");

    let capture = timeout(deadline, cluster.exec(namespace, workload, command))
        .await
        .map_err(|_| ExecError::Timeout(deadline))?
        .map_err(ExecError::Setup)?;

    if let Some(cause) = capture.failure {
        return Err(ExecError::Stream {
            cause,
            stderr: capture.stderr.trim().to_string(),
        });
    }

    Ok(capture.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::cluster::ExecCapture;
    use async_trait::async_trait;

    struct FixedExec {
        outcome: fn() -> Result<ExecCapture, ClusterError>,
        delay: Duration,
    }

    #[async_trait]
    impl ClusterApi for FixedExec {
        async fn list_workloads(&self, _: &str, _: &str) -> Result<Vec<String>, ClusterError> {
            Ok(vec![])
        }

        async fn exec(&self, _: &str, _: &str, _: &[String]) -> Result<ExecCapture, ClusterError> {
            tokio::time::sleep(self.delay).await;
            (self.outcome)()
        }
    }

    fn cmd() -> Vec<String> {
        vec!["ollama".to_string(), "ps".to_string()]
    }

    async fn run(cluster: FixedExec) -> Result<String, ExecError> {
        execute(&cluster, "ollama-0", "ollama", &cmd(), Duration::from_millis(200)).await
    }

    #[tokio::test]
    async fn returns_stdout_and_drops_stderr() {
        let out = run(FixedExec {
            outcome: || {
                Ok(ExecCapture {
                    stdout: "NAME ID SIZE PROCESSOR UNTIL\n".into(),
                    stderr: "some warning".into(),
                    failure: None,
                })
            },
            delay: Duration::ZERO,
        })
        .await
        .unwrap();
        assert_eq!(out, "NAME ID SIZE PROCESSOR UNTIL\n");
    }

    #[tokio::test]
    async fn setup_failure_wraps_the_cause() {
        let err = run(FixedExec {
            outcome: || Err(ClusterError::Other("pods \"ollama-0\" not found".into())),
            delay: Duration::ZERO,
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ExecError::Setup(_)));
        assert_eq!(
            err.to_string(),
            "failed to create executor: pods \"ollama-0\" not found"
        );
    }

    #[tokio::test]
    async fn stream_failure_carries_stderr() {
        let err = run(FixedExec {
            outcome: || {
                Ok(ExecCapture {
                    stdout: String::new(),
                    stderr: "Error: could not connect to ollama app\n".into(),
                    failure: Some("command terminated with exit code 1".into()),
                })
            },
            delay: Duration::ZERO,
        })
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to stream command execution: command terminated with exit code 1 \
             (stderr: Error: could not connect to ollama app)"
        );
    }

    #[tokio::test]
    async fn hung_stream_hits_the_deadline() {
        let err = run(FixedExec {
            outcome: || Ok(ExecCapture::default()),
            delay: Duration::from_secs(5),
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ExecError::Timeout(d) if d == Duration::from_millis(200)));
    }
}
