//! Cluster API capability: pod discovery and remote exec.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use kube::api::{Api, AttachParams, ListParams};
use kube::{Client, ResourceExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// For `ClusterApi` implementations not backed by a kube client.
    #[error("{0}")]
    Other(String),
}

/// Everything an exec stream produced. `failure` is set when the stream was
/// established but the command did not complete successfully.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecCapture {
    pub stdout: String,
    pub stderr: String,
    pub failure: Option<String>,
}

#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Pod names matching `label_selector`, in the order the API lists them.
    async fn list_workloads(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<String>, ClusterError>;

    /// Runs `command` in `workload` with stdout and stderr attached, no stdin
    /// and no TTY. An `Err` means the stream could not be set up.
    async fn exec(
        &self,
        namespace: &str,
        workload: &str,
        command: &[String],
    ) -> Result<ExecCapture, ClusterError>;
}

pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        KubeCluster { client }
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn list_workloads(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<String>, ClusterError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods.list(&ListParams::default().labels(label_selector)).await?;
        Ok(list.items.iter().map(|pod| pod.name_any()).collect())
    }

    async fn exec(
        &self,
        namespace: &str,
        workload: &str,
        command: &[String],
    ) -> Result<ExecCapture, ClusterError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = AttachParams::default()
            .stdin(false)
            .stdout(true)
            .stderr(true)
            .tty(false);

        let mut attached = pods.exec(workload, command.to_vec(), &params).await?;

        let stdout = attached.stdout();
        let stderr = attached.stderr();
        let status = attached.take_status();

        let (stdout, stderr) = tokio::join!(read_stream(stdout), read_stream(stderr));
        let status = match status {
            Some(status) => status.await,
            None => None,
        };
        let joined = attached.join().await.map_err(|e| e.to_string());

        Ok(collect_capture(stdout, stderr, status, joined))
    }
}

/// Folds the pieces of a finished exec stream into one capture. Any read
/// error, non-success status or driver error marks the capture as failed.
fn collect_capture(
    stdout: std::io::Result<String>,
    stderr: std::io::Result<String>,
    status: Option<Status>,
    joined: Result<(), String>,
) -> ExecCapture {
    let mut capture = ExecCapture::default();
    let mut failures = Vec::new();

    match stdout {
        Ok(text) => capture.stdout = text,
        Err(e) => failures.push(format!("reading stdout: {}", e)),
    }
    match stderr {
        Ok(text) => capture.stderr = text,
        Err(e) => failures.push(format!("reading stderr: {}", e)),
    }

    if let Some(status) = status {
        if status.status.as_deref() != Some("Success") {
            let message = status
                .message
                .or(status.reason)
                .unwrap_or_else(|| "command exited unsuccessfully".to_string());
            failures.push(message);
        }
    }

    if let Err(e) = joined {
        failures.push(e);
    }

    if !failures.is_empty() {
        capture.failure = Some(failures.join("; "));
    }
    capture
}

async fn read_stream<R>(stream: Option<R>) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(mut stream) = stream else {
        return Ok(String::new());
    };
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}
