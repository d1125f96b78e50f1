//! Deployments API
//!
//! Wire models shared with the deployments REST backend.

pub mod models;
