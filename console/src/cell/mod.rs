//! Deployment cells

pub mod fsm;
pub mod grid;
pub mod icon;
pub mod id;
pub mod selector;
pub mod status;
