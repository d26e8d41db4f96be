use serde::{Deserialize, Serialize};

/// One row of the workload's loaded-model table, in source order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    pub name: String,
    pub identifier: String,
    pub raw_size: String,
    pub processor_label: String,
    pub expiry: String,
}

/// GPU memory budget in GiB. Rebuilt for every snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct CapacityBudget {
    pub total_capacity: f64,
    pub used_capacity: f64,
    pub remaining_capacity: f64,
    pub used_percentage: f64,
}

impl CapacityBudget {
    pub fn compute(total_capacity: f64, used_capacity: f64) -> Self {
        let used_percentage = if total_capacity > 0.0 {
            (used_capacity / total_capacity) * 100.0
        } else {
            0.0
        };

        CapacityBudget {
            total_capacity,
            used_capacity,
            remaining_capacity: total_capacity - used_capacity,
            used_percentage,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    pub records: Vec<ResourceRecord>,
    pub budget: CapacityBudget,
    /// Name of the pod that was queried. Empty when discovery failed.
    pub source_identity: String,
    pub namespace: String,
    pub diagnostic: Option<String>,
}

impl AggregationResult {
    pub fn new(namespace: &str) -> Self {
        AggregationResult {
            namespace: namespace.to_string(),
            ..Default::default()
        }
    }

    /// Failure results never carry partial data.
    pub fn with_diagnostic(mut self, message: impl Into<String>) -> Self {
        self.records.clear();
        self.budget = CapacityBudget::default();
        self.diagnostic = Some(message.into());
        self
    }
}
