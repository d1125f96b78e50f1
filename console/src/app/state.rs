//! Console state shared by the controllers

use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::options::AppOptions;
use crate::cell::grid::Grid;
use crate::cell::id::CellId;
use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::http::DeploymentsApi;
use crate::ui::drag_drop::{DragDropController, DropMode, DropOutcome, RejectReason};
use crate::ui::menu::{MenuController, MenuView};

/// Grid plus the controllers acting on it
pub struct Console {
    grid: Arc<Grid>,
    menu: MenuController,
    drag_drop: DragDropController,
}

impl Console {
    /// Create a console over any backend implementation
    pub fn new(api: Arc<dyn DeploymentsApi>) -> Self {
        let grid = Arc::new(Grid::new());
        Self {
            menu: MenuController::new(api.clone(), grid.clone()),
            drag_drop: DragDropController::new(api, grid.clone()),
            grid,
        }
    }

    /// Create a console talking HTTP to the configured backend
    pub fn connect(options: &AppOptions) -> Result<Self, ConsoleError> {
        let client = HttpClient::new(&options.backend_base_url, options.request_timeout)?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn drag_drop(&self) -> &DragDropController {
        &self.drag_drop
    }

    /// Drop the dragged deployment on `target`, discarding the menus it changed
    pub async fn drop(&self, target: &str, effect: &str) -> DropOutcome {
        let source = self.drag_drop.source();
        let outcome = self.drag_drop.drop(target, effect).await;
        if !matches!(outcome, DropOutcome::Ignored(_)) {
            if let Some(source) = &source {
                self.menu.close(source);
            }
            if let Some(target) = CellId::decode(target) {
                self.menu.close(&target);
            }
        }
        outcome
    }

    /// Full drag gesture from `from` onto `to`
    ///
    /// Both cells are fetched first so the grid knows what is deployed where.
    /// The gesture is abandoned when either fetch fails. Their menus are
    /// discarded afterwards since the versions changed.
    pub async fn drag(&self, from: &CellId, to: &CellId, mode: DropMode) -> DropOutcome {
        futures::join!(self.menu.open(from), self.menu.open(to));

        let unknown = [from, to]
            .into_iter()
            .find(|cell| !matches!(self.menu.view(cell), MenuView::Ready { .. }));
        let outcome = if let Some(cell) = unknown {
            warn!("Versions of {} are unknown, not dropping", cell);
            DropOutcome::Ignored(RejectReason::UnknownState)
        } else {
            match self.drag_drop.drag_start(&from.to_string()) {
                Ok(()) => {
                    let target = to.to_string();
                    let verdict = self.drag_drop.drag_over(&target);
                    debug!("Dropping {} on {}: {:?}", from, to, verdict);
                    self.drop(&target, mode.effect()).await
                }
                Err(reason) => DropOutcome::Ignored(reason),
            }
        };
        self.drag_drop.drag_end();

        self.menu.close(from);
        self.menu.close(to);
        outcome
    }
}
