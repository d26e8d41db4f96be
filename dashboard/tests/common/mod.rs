// In-memory stand-in for the Kubernetes API.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use vram_view::system::cluster::{ClusterApi, ClusterError, ExecCapture};

pub const PS_OUTPUT: &str = "\
NAME                 ID              SIZE      PROCESSOR    UNTIL
llama3.1:8b          46e0c10c039e    6.7 GB    100% GPU     4 minutes from now
nomic-embed-text     0a109f422b47    849 MB    100% GPU     Forever
";

#[derive(Default)]
pub struct MockCluster {
    pub pods: Vec<String>,
    pub stdout: String,
    pub stream_failure: Option<String>,
    pub exec_calls: AtomicUsize,
}

impl MockCluster {
    pub fn serving(stdout: &str) -> Self {
        MockCluster {
            pods: vec!["ollama-serve-5c8d9".to_string()],
            stdout: stdout.to_string(),
            ..Default::default()
        }
    }

    pub fn exec_count(&self) -> usize {
        self.exec_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterApi for MockCluster {
    async fn list_workloads(&self, _namespace: &str, _selector: &str) -> Result<Vec<String>, ClusterError> {
        Ok(self.pods.clone())
    }

    async fn exec(&self, _namespace: &str, _workload: &str, _command: &[String]) -> Result<ExecCapture, ClusterError> {
        self.exec_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ExecCapture {
            stdout: self.stdout.clone(),
            stderr: "ollama: connection reset".to_string(),
            failure: self.stream_failure.clone(),
        })
    }
}
