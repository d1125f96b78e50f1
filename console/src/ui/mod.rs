//! Controllers behind the dashboard widgets

pub mod drag_drop;
pub mod menu;
