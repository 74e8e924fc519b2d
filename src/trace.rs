//! Materialized trace produced by [`Reader::read_all`](crate::Reader::read_all)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, ResultExt};
use crate::reader::HeaderInfo;
use crate::types::{ReadValue, Value, Variable};

/// A complete trace: header metadata, declarations, and per-variable histories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub header: HeaderInfo,
    /// Variables in declaration order
    pub variables: Vec<Variable>,
    /// Value history per qualified name, in read order
    pub histories: BTreeMap<String, Vec<ReadValue>>,
}

impl Trace {
    /// Look up a variable by qualified name
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// All values recorded for a variable
    pub fn history(&self, name: &str) -> Option<&[ReadValue]> {
        self.histories.get(name).map(Vec::as_slice)
    }

    /// The value a variable held at `time`: the last change at or before it
    pub fn value_at(&self, name: &str, time: u64) -> Option<&Value> {
        let history = self.histories.get(name)?;
        let idx = history.partition_point(|v| v.time <= time);
        if idx == 0 {
            None
        } else {
            Some(&history[idx - 1].value)
        }
    }

    /// Time of the latest value change in any history
    pub fn end_time(&self) -> Option<u64> {
        self.histories
            .values()
            .filter_map(|h| h.last().map(|v| v.time))
            .max()
    }

    /// Total number of recorded values
    pub fn event_count(&self) -> usize {
        self.histories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }

    /// Export the trace as pretty JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize trace")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write trace export {:?}", path))?;
        tracing::info!("Exported trace to {:?}", path);
        Ok(())
    }

    /// Load a trace previously exported with [`save_json`](Self::save_json)
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace export {:?}", path))?;
        serde_json::from_str::<Self>(&json)
            .with_context(|| format!("Failed to parse trace export {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VcdError;
    use crate::types::BitValue;

    fn sample() -> Trace {
        let mut trace = Trace::default();
        trace.histories.insert(
            "logic.cs".to_string(),
            (0..10)
                .map(|i| ReadValue {
                    time: i * 100,
                    value: Value::Vector(BitValue::Int(i as u128 % 2)),
                })
                .collect(),
        );
        trace.histories.insert("logic.idle".to_string(), Vec::new());
        trace
    }

    #[test]
    fn test_value_at() {
        let trace = sample();
        assert_eq!(trace.value_at("logic.cs", 0).and_then(Value::as_u128), Some(0));
        assert_eq!(trace.value_at("logic.cs", 150).and_then(Value::as_u128), Some(1));
        assert_eq!(trace.value_at("logic.cs", 500).and_then(Value::as_u128), Some(1));
        assert_eq!(trace.value_at("logic.cs", 10_000).and_then(Value::as_u128), Some(1));
        assert!(trace.value_at("logic.idle", 100).is_none());
        assert!(trace.value_at("missing", 100).is_none());
    }

    #[test]
    fn test_value_before_first_change() {
        let mut trace = Trace::default();
        trace.histories.insert(
            "a".to_string(),
            vec![ReadValue {
                time: 50,
                value: Value::Real("1.0".into()),
            }],
        );
        assert!(trace.value_at("a", 49).is_none());
        assert!(trace.value_at("a", 50).is_some());
    }

    #[test]
    fn test_counts() {
        let trace = sample();
        assert_eq!(trace.event_count(), 10);
        assert_eq!(trace.end_time(), Some(900));
        assert!(!trace.is_empty());
        assert!(Trace::default().end_time().is_none());
    }

    #[test]
    fn test_json_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let trace = sample();
        trace.save_json(&path).unwrap();
        assert_eq!(Trace::load_json(&path).unwrap(), trace);
    }

    #[test]
    fn test_json_errors_name_the_path() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        let err = Trace::load_json(&missing).unwrap_err();
        assert!(matches!(err.root(), VcdError::Io(_)));
        assert!(err.to_string().contains("missing.json"));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{ not json").unwrap();
        let err = Trace::load_json(&garbage).unwrap_err();
        assert!(matches!(err.root(), VcdError::Json(_)));
        assert!(err.to_string().contains("garbage.json"));

        let unwritable = dir.path().join("no_such_dir").join("trace.json");
        let err = sample().save_json(&unwritable).unwrap_err();
        assert!(matches!(err.root(), VcdError::Io(_)));
        assert!(err.to_string().contains("no_such_dir"));
    }
}
