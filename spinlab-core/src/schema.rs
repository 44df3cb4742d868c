//! Strategy persistence — the structured text format for saved strategies.
//!
//! A saved document bundles the table rules with the tree so a strategy
//! re-hydrates into exactly the session it was authored for. The engine
//! makes no validity assumptions about loaded trees beyond structure;
//! callers run [`Strategy::validate`] before simulating.

use crate::engine::TableConfig;
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current schema version for persisted strategy documents.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unsupported schema version {0} (supported: {SCHEMA_VERSION})")]
    UnsupportedVersion(u32),
    #[error("strategy document parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("strategy document io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A complete saved strategy: table rules plus the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub table: TableConfig,
    pub strategy: Strategy,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl StrategyDocument {
    pub fn new(table: TableConfig, strategy: Strategy) -> Self {
        StrategyDocument {
            schema_version: SCHEMA_VERSION,
            table,
            strategy,
        }
    }

    /// Parse a document, re-canonicalizing every wager set so that
    /// hand-edited files compare correctly.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let mut doc: StrategyDocument = serde_json::from_str(json)?;
        if doc.schema_version != SCHEMA_VERSION {
            return Err(SchemaError::UnsupportedVersion(doc.schema_version));
        }
        doc.strategy.canonicalize();
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SchemaError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Wager;
    use crate::strategy::{NodeKind, StrategyNode};

    fn sample() -> StrategyDocument {
        let mut strategy = Strategy::new(100, 900);
        let root = strategy.add(
            StrategyNode::new(NodeKind::StartImmediately)
                .with_wagers(vec![Wager::red(10), Wager::straight(17, 1)]),
        );
        strategy.nodes[root.0].on_win = Some(root);
        strategy.nodes[root.0].on_loss = Some(root);
        StrategyDocument::new(TableConfig::default(), strategy)
    }

    #[test]
    fn roundtrip() {
        let doc = sample();
        let json = doc.to_json().unwrap();
        let back = StrategyDocument::from_json(&json).unwrap();
        assert_eq!(doc, back);
    }

    #[test]
    fn unknown_version_rejected() {
        let doc = sample();
        let json = doc.to_json().unwrap().replace(
            "\"schema_version\": 1",
            "\"schema_version\": 99",
        );
        assert!(matches!(
            StrategyDocument::from_json(&json),
            Err(SchemaError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn loaded_wagers_are_canonicalized() {
        // Hand-edited file with unsorted numbers.
        let mut doc = sample();
        doc.strategy.nodes[0].wagers[1].numbers = vec![20, 17];
        let json = serde_json::to_string(&doc).unwrap();
        let back = StrategyDocument::from_json(&json).unwrap();
        assert_eq!(back.strategy.nodes[0].wagers[1].numbers, vec![17, 20]);
    }
}
