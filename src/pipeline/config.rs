//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tunables for [`AnalysisPipeline`](super::AnalysisPipeline).
///
/// Every field has a default, so a partial JSON object is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name given to each pass worker thread.
    pub worker_thread_name: String,
    /// Upper bound on idle metric vectors kept for reuse.
    pub max_pooled_vectors: usize,
    /// Graph attribute holding the depth analysis root node index.
    pub root_attribute: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_thread_name: "spacegraph-analysis".into(),
            max_pooled_vectors: 64,
            root_attribute: "root_node_index".into(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_thread_name.is_empty() || self.worker_thread_name.contains('\0') {
            return Err(Error::Config(format!(
                "invalid worker thread name {:?}",
                self.worker_thread_name
            )));
        }
        if self.root_attribute.is_empty() {
            return Err(Error::Config("root attribute name is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json(r#"{"max_pooled_vectors": 8}"#).unwrap();
        assert_eq!(config.max_pooled_vectors, 8);
        assert_eq!(config.root_attribute, "root_node_index");
        assert_eq!(config.worker_thread_name, "spacegraph-analysis");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"worker_thread_name": ""}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json(r#"{"root_attribute": ""}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(PipelineConfig::from_json("{"), Err(Error::Json(_))));
    }
}
