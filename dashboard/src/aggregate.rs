//! One snapshot: discover the pod, run the status command, fold the table.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::timeout;
use tracing::{error, info, warn};
use vram_view_shared::{AggregationResult, CapacityBudget};

use crate::config::DashboardConfig;
use crate::system::cluster::{ClusterApi, ClusterError};
use crate::system::{exec, table};

pub const NO_WORKLOAD: &str = "no matching workload found";

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("failed to list workloads: {0}")]
    Api(#[source] ClusterError),

    #[error("workload discovery did not finish within {0:?}")]
    Timeout(Duration),
}

pub struct Aggregator {
    cluster: Arc<dyn ClusterApi>,
    config: DashboardConfig,
}

impl Aggregator {
    pub fn new(cluster: Arc<dyn ClusterApi>, config: DashboardConfig) -> Self {
        Aggregator { cluster, config }
    }

    /// Never fails. Every error ends up as the result's diagnostic.
    pub async fn snapshot(&self) -> AggregationResult {
        let mut result = AggregationResult::new(&self.config.namespace);

        let workloads = match self.discover().await {
            Ok(workloads) => workloads,
            Err(e) => {
                error!(error = %e, "workload discovery failed");
                return result.with_diagnostic(e.to_string());
            }
        };

        // First in listing order, no ranking.
        let Some(workload) = workloads.into_iter().next() else {
            warn!(
                namespace = %self.config.namespace,
                selector = %self.config.label_selector,
                "no workload matches selector"
            );
            return result.with_diagnostic(NO_WORKLOAD);
        };
        result.source_identity = workload.clone();

        let output = match exec::execute(
            self.cluster.as_ref(),
            &workload,
            &self.config.namespace,
            &self.config.command,
            self.config.exec_timeout(),
        )
        .await
        {
            Ok(output) => output,
            Err(e) => {
                error!(%workload, error = %e, "remote command failed");
                let message = format!("failed to execute '{}': {}", self.config.command_line(), e);
                return result.with_diagnostic(message);
            }
        };

        let parsed = table::parse(&output);
        result.budget = CapacityBudget::compute(self.config.total_vram_gib, parsed.total_gib);
        result.records = parsed.records;

        info!(
            %workload,
            models = result.records.len(),
            used_gib = result.budget.used_capacity,
            skipped_rows = parsed.skipped_rows,
            conversion_warnings = parsed.conversion_warnings,
            "snapshot complete"
        );
        result
    }

    async fn discover(&self) -> Result<Vec<String>, DiscoveryError> {
        let deadline = self.config.exec_timeout();
        timeout(
            deadline,
            self.cluster
                .list_workloads(&self.config.namespace, &self.config.label_selector),
        )
        .await
        .map_err(|_| DiscoveryError::Timeout(deadline))?
        .map_err(DiscoveryError::Api)
    }
}
