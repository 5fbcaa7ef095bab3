//! Reversible text editing built on commands.
//!
//! # Architecture
//!
//! - [`MutationContext`]: what a command may do to the host's buffer
//! - [`StringContext`] / [`RopeContext`]: ready-made contexts
//! - [`Command`]: one insert, delete or replace, able to undo itself
//! - [`HistoryStack`]: ordered record of commands with undo, redo and jump
//!
//! # Example
//!
//! ```
//! use revise::history::{Command, HistoryStack, StringContext};
//!
//! let mut ctx = StringContext::new("Hello World");
//! let mut history = HistoryStack::default();
//!
//! history.execute_command(&mut ctx, Command::insert("XYZ", 5));
//! assert_eq!(ctx.as_str(), "HelloXYZ World");
//!
//! history.undo(&mut ctx);
//! assert_eq!(ctx.as_str(), "Hello World");
//! ```

mod command;
mod context;
mod position;
mod stack;

pub use command::{Command, CommandKind};
pub use context::{ContextError, MutationContext, RopeContext, StringContext};
pub use position::TextRange;
pub use stack::{
    HistoryEntry, HistoryListItem, HistoryStack, HistoryStats, DEFAULT_MAX_HISTORY_SIZE,
};
