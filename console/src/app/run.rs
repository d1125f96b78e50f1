//! Execution of console commands

use tracing::info;

use crate::app::options::AppOptions;
use crate::app::render::{render_command, render_drop, render_menu};
use crate::app::state::Console;
use crate::cell::id::CellId;
use crate::errors::ConsoleError;
use crate::ui::drag_drop::{DropMode, DropOutcome};
use crate::ui::menu::{CommandOutcome, MenuView};

/// One user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Versions(CellId),
    Deploy { cell: CellId, version: String },
    Undeploy(CellId),
    Balance(CellId),
    Unbalance(CellId),
    Remove(CellId),
    Transfer { from: CellId, to: CellId, mode: DropMode },
}

/// Connect to the backend and execute a command
pub async fn run(options: &AppOptions, command: Command) -> Result<bool, ConsoleError> {
    info!("Using deployments API at {}", options.backend_base_url);
    let console = Console::connect(options)?;
    Ok(execute(&console, command).await)
}

/// Execute a command, printing its result; `true` on success
pub async fn execute(console: &Console, command: Command) -> bool {
    let menu = console.menu();
    match command {
        Command::Versions(cell) => {
            menu.open(&cell).await;
            let view = menu.view(&cell);
            print!("{}", render_menu(&cell, &view));
            matches!(view, MenuView::Ready { .. })
        }
        Command::Deploy { cell, version } => {
            menu.open(&cell).await;
            let outcome = menu.select(&cell, &version).await;
            report(&format!("deploy {}", version), &cell, outcome)
        }
        Command::Undeploy(cell) => {
            menu.open(&cell).await;
            report("undeploy", &cell, menu.undeploy(&cell).await)
        }
        Command::Balance(cell) => {
            menu.open(&cell).await;
            report("balance", &cell, menu.balance(&cell).await)
        }
        Command::Unbalance(cell) => {
            menu.open(&cell).await;
            report("unbalance", &cell, menu.unbalance(&cell).await)
        }
        Command::Remove(cell) => {
            menu.open(&cell).await;
            report("remove", &cell, menu.remove(&cell).await)
        }
        Command::Transfer { from, to, mode } => {
            let outcome = console.drag(&from, &to, mode).await;
            println!("{}", render_drop(&from, &to, &outcome));
            matches!(outcome, DropOutcome::Copied | DropOutcome::Moved)
        }
    }
}

fn report(what: &str, cell: &CellId, outcome: CommandOutcome) -> bool {
    println!("{}", render_command(what, cell, outcome));
    outcome == CommandOutcome::Applied
}
