//! Deployment grid

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::cell::fsm::{CellEvent, CellFsm};
use crate::cell::id::CellId;
use crate::cell::status::CellStatus;
use crate::errors::ConsoleError;

/// One independent status machine per cell
pub struct Grid {
    cells: RwLock<HashMap<CellId, CellFsm>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a cell
    pub fn insert(&self, cell: CellId, fsm: CellFsm) {
        let mut cells = self.cells.write().unwrap_or_else(|e| e.into_inner());
        cells.insert(cell, fsm);
    }

    /// Get a copy of a cell's machine
    pub fn get(&self, cell: &CellId) -> Option<CellFsm> {
        let cells = self.cells.read().unwrap_or_else(|e| e.into_inner());
        cells.get(cell).cloned()
    }

    /// Status of a cell, unknown cells are undeployed
    pub fn status(&self, cell: &CellId) -> CellStatus {
        self.get(cell).map(|fsm| fsm.status()).unwrap_or_default()
    }

    /// Version deployed on a cell
    pub fn version(&self, cell: &CellId) -> Option<String> {
        self.get(cell).and_then(|fsm| fsm.version().map(str::to_string))
    }

    /// Feed an event to a cell's machine
    pub fn apply(&self, cell: &CellId, event: CellEvent) -> Result<CellStatus, ConsoleError> {
        let mut cells = self.cells.write().unwrap_or_else(|e| e.into_inner());
        let fsm = cells.entry(cell.clone()).or_default();
        let status = fsm.process(event)?;
        debug!("cell {} is now {}", cell, status);
        Ok(status)
    }

    /// Live cells, sorted
    pub fn cells(&self) -> Vec<CellId> {
        let cells = self.cells.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<CellId> = cells
            .iter()
            .filter(|(_, fsm)| !fsm.is_removed())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Get grid size
    pub fn len(&self) -> usize {
        let cells = self.cells.read().unwrap_or_else(|e| e.into_inner());
        cells.len()
    }

    /// Check if grid is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
