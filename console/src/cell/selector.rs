//! Presentation form of cell addresses
//!
//! Element ids contain `:`, which must be escaped before being used in a
//! CSS selector.

use crate::cell::id::{CellId, SEPARATOR};

/// Escape every separator with a backslash
pub fn escape(id: &str) -> String {
    id.replace(SEPARATOR, "\\:")
}

/// Id selector for an element id
pub fn id_selector(id: &str) -> String {
    format!("#{}", escape(id))
}

impl CellId {
    /// CSS selector of the cell element
    pub fn selector(&self) -> String {
        id_selector(&self.to_string())
    }

    /// Selector of an element with the given class inside the cell
    pub fn child_selector(&self, class_name: &str) -> String {
        format!("{} .{}", self.selector(), class_name)
    }

    pub fn cluster_header(&self) -> HeaderId {
        HeaderId::Cluster(self.cluster_id().to_string())
    }

    pub fn node_header(&self) -> HeaderId {
        HeaderId::Node(self.node_id().to_string())
    }
}

/// Row or column header of the grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeaderId {
    Cluster(String),
    Node(String),
}

impl HeaderId {
    /// Element id of the header
    pub fn dom_id(&self) -> String {
        match self {
            HeaderId::Cluster(id) => format!("cluster{SEPARATOR}{id}"),
            HeaderId::Node(id) => format!("node{SEPARATOR}{id}"),
        }
    }

    pub fn selector(&self) -> String {
        id_selector(&self.dom_id())
    }
}
