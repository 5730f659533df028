//! UI layer for the desktop form: app shell and insight image handling.

pub mod app;
pub mod images;

pub use app::{BlitzWatchApp, StartupConfig};
