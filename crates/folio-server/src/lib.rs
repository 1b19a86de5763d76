//! Development server with live reload for folio sites.
//!
//! Builds the site, serves the output directory, watches the source tree and
//! rebuilds on change, then tells connected browsers to reload.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};
