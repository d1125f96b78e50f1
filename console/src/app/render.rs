//! Terminal rendering of menus and outcomes

use colored::Colorize;

use crate::cell::id::CellId;
use crate::cell::status::{CellStatus, DeploymentStatus};
use crate::ui::drag_drop::DropOutcome;
use crate::ui::menu::{CommandOutcome, MenuRow, MenuView};

/// Render a menu, one row per line
pub fn render_menu(cell: &CellId, view: &MenuView) -> String {
    let mut out = format!("{}\n", cell.to_string().bold());
    match view {
        MenuView::Closed => out.push_str("  (closed)\n"),
        MenuView::Loading => out.push_str("  loading...\n"),
        MenuView::Empty => out.push_str("  (no versions)\n"),
        MenuView::Ready { rows, .. } => {
            for row in rows {
                out.push_str(&format!("  {} {}\n", row.icon().glyph(), paint(row)));
            }
        }
    }
    out
}

fn paint(row: &MenuRow) -> String {
    match row {
        MenuRow::Version { name, status, .. } => {
            let label = format!("{} ({})", name, status);
            match status {
                CellStatus { pending: true, .. } => label.yellow().to_string(),
                CellStatus {
                    base: DeploymentStatus::Deployed,
                    ..
                } => label.green().to_string(),
                CellStatus {
                    base: DeploymentStatus::Undeployed,
                    ..
                } => label.dimmed().to_string(),
                _ => label.cyan().to_string(),
            }
        }
        MenuRow::Action(action) => action.label().italic().to_string(),
    }
}

pub fn render_command(what: &str, cell: &CellId, outcome: CommandOutcome) -> String {
    match outcome {
        CommandOutcome::Applied => format!("{} {} on {}", "ok".green(), what, cell),
        CommandOutcome::RolledBack => format!("{} {} on {} failed, rolled back", "error".red(), what, cell),
        CommandOutcome::Rejected => format!("{} cannot {} {} in its current state", "rejected".yellow(), what, cell),
    }
}

pub fn render_drop(from: &CellId, to: &CellId, outcome: &DropOutcome) -> String {
    match outcome {
        DropOutcome::Copied => format!("{} copied {} to {}", "ok".green(), from, to),
        DropOutcome::Moved => format!("{} moved {} to {}", "ok".green(), from, to),
        DropOutcome::DeployFailed => format!("{} deploying on {} failed, {} untouched", "error".red(), to, from),
        DropOutcome::UndeployFailed => format!(
            "{} deployed on {} but {} is still deployed",
            "error".red(),
            to,
            from
        ),
        DropOutcome::Ignored(reason) => format!("{} {:?}", "rejected".yellow(), reason),
    }
}
