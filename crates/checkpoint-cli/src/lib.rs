//! Checkpoint: a terminal client for reviewing model promote requests.
//!
//! Commands mount views; views ask [`actions`] for data; actions call the
//! registry through the [`gateway`] and return [`store::Event`]s that
//! [`store::reduce`] folds into the state the views render.

pub mod types;
pub mod diff;
pub mod routes;
pub mod store;
pub mod gateway;
pub mod actions;
pub mod views;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logging;
