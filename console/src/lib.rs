//! Deployment Console Library
//!
//! Core of a deployment dashboard: cell addressing, per-cell status machines,
//! version menus and drag/drop of deployments between cells.

pub mod app;
pub mod cell;
pub mod errors;
pub mod http;
pub mod logs;
pub mod storage;
pub mod ui;
pub mod utils;
