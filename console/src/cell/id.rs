//! Composite cell identifiers
//!
//! A cell is addressed as `cluster:node:app`. In the five segment form
//! (`host:slot:stage:index:app`) the cluster id is `host:slot` and the node
//! id is `stage:index`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConsoleError;

/// Segment separator
pub const SEPARATOR: char = ':';

/// Address of one (cluster, node, application) slot in the grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId {
    cluster_id: String,
    node_id: String,
    app_name: String,
}

impl CellId {
    /// Build a cell id from its parts
    ///
    /// Fails when the joined form would not decode back into the same parts,
    /// e.g. when the app name contains a separator.
    pub fn new(
        cluster_id: impl Into<String>,
        node_id: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Result<Self, ConsoleError> {
        let candidate = Self {
            cluster_id: cluster_id.into(),
            node_id: node_id.into(),
            app_name: app_name.into(),
        };
        let encoded = candidate.to_string();
        match Self::decode(&encoded) {
            Some(decoded) if decoded == candidate => Ok(candidate),
            _ => Err(ConsoleError::InvalidCellId(encoded)),
        }
    }

    /// Join the parts into the wire form
    pub fn encode(cluster_id: &str, node_id: &str, app_name: &str) -> String {
        format!("{cluster_id}{SEPARATOR}{node_id}{SEPARATOR}{app_name}")
    }

    /// Parse the wire form, `None` on a wrong segment count or empty key parts
    pub fn decode(id: &str) -> Option<Self> {
        let segments: Vec<&str> = id.split(SEPARATOR).collect();
        let (cluster_id, node_id, app_name) = match segments.as_slice() {
            [cluster, node, app] => (cluster.to_string(), node.to_string(), *app),
            [host, slot, stage, index, app] => (
                format!("{host}{SEPARATOR}{slot}"),
                format!("{stage}{SEPARATOR}{index}"),
                *app,
            ),
            _ => return None,
        };

        if segments[0].is_empty() || app_name.is_empty() {
            return None;
        }

        Some(Self {
            cluster_id,
            node_id,
            app_name: app_name.to_string(),
        })
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Same cluster and same node
    pub fn same_location(&self, other: &CellId) -> bool {
        self.cluster_id == other.cluster_id && self.node_id == other.node_id
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::encode(&self.cluster_id, &self.node_id, &self.app_name))
    }
}

impl FromStr for CellId {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s).ok_or_else(|| ConsoleError::InvalidCellId(s.to_string()))
    }
}

impl TryFrom<String> for CellId {
    type Error = ConsoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.to_string()
    }
}

/// Cluster id of a cell id string
pub fn cluster_of(id: &str) -> Option<String> {
    CellId::decode(id).map(|cell| cell.cluster_id)
}

/// Node id of a cell id string
pub fn node_of(id: &str) -> Option<String> {
    CellId::decode(id).map(|cell| cell.node_id)
}
