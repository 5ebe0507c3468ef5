//! Library half of the `claims` binary: configuration, logging and the
//! translation of view flags into table state.

pub mod config;
pub mod logging;
pub mod view;
