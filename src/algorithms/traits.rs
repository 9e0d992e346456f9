use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use crate::graph::{GraphStore, NodeId};
use crate::error::{GraphError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParams {
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl AlgorithmParams {
    pub fn new() -> Self {
        Self {
            params: serde_json::Map::new(),
        }
    }

    /// Parse parameters from a JSON object such as `{"source": 0}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let params = serde_json::from_str(json)?;
        Ok(Self { params })
    }

    pub fn with_param<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.params.insert(
            key.to_string(),
            serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
        );
        self
    }

    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.params.get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Fetch a node id parameter that the algorithm cannot run without.
    pub fn node(&self, key: &str) -> Result<NodeId> {
        self.get(key)
            .ok_or_else(|| GraphError::invalid_parameter(format!("{} parameter required", key)))
    }
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self::new()
    }
}

pub trait GraphAlgorithm {
    fn execute(&self, graph: &GraphStore, params: &AlgorithmParams) -> Result<RecordBatch>;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        "Graph algorithm"
    }
}
