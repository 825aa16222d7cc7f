//! CLI commands

pub mod check;
pub mod list;
pub mod render;
pub mod show;
pub mod watch;
