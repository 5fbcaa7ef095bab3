//! revise - reversible text editing
//!
//! This crate provides a command-based undo/redo engine for text buffers
//! and a small publish/subscribe layer for announcing configuration changes.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod history;
pub mod notify;
pub mod script;
pub mod session;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::EngineConfig;
pub use history::{Command, HistoryStack, MutationContext, StringContext};
pub use notify::{Broadcaster, Observer};
pub use session::EditSession;
