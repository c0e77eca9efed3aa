//! Loopback HTTP server for the bundled wallet content.
//!
//! [`LocalServer`] owns one background thread with its own tokio runtime
//! and serves `GET` requests from a [`ContentResolver`].

pub mod content;
pub mod mime;
pub mod server;

mod handler;
mod listener;

pub use content::{resolver_for, ContentResolver, FileSystemResolver, NetworkResolver};
pub use mime::mime_for_path;
pub use server::LocalServer;
