//! Position-indexed history of executed commands.
//!
//! Entries are appended in execution order and never reordered. A single
//! cursor, `current_position`, splits the list: entries before it are
//! applied to the buffer, entries at or after it form the redo tail.

use std::time::Duration;

use serde::Serialize;

use crate::config::EngineConfig;

use super::command::Command;
use super::context::MutationContext;

/// Default maximum number of retained entries
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 100;

/// One recorded command and its insertion order
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Monotonic sequence number, unique for the lifetime of the stack
    pub seq: u64,
    pub command: Command,
}

/// Summary numbers for status displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total_commands: usize,
    pub current_position: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Rough estimate of bytes held for undo. Diagnostic only.
    pub memory_usage: usize,
}

/// Read-only projection of one entry for history panels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryListItem {
    pub index: usize,
    pub description: String,
    pub executed: bool,
    pub can_undo: bool,
}

/// Linear undo/redo history with jump-to-point navigation.
///
/// The stack doesn't own the buffer. Every mutating call takes the host's
/// [`MutationContext`], and the same context must be passed each time.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    current_position: usize,
    max_history_size: usize,
    auto_persist_interval: Option<Duration>,
    next_seq: u64,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_SIZE)
    }
}

impl HistoryStack {
    /// Create an empty stack retaining at most `max_history_size` entries (minimum 1)
    pub fn new(max_history_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_position: 0,
            max_history_size: max_history_size.max(1),
            auto_persist_interval: None,
            next_seq: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut stack = Self::new(config.max_history_size);
        stack.auto_persist_interval = config.auto_persist_interval();
        stack
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_position(&self) -> usize {
        self.current_position
    }

    pub fn can_undo(&self) -> bool {
        self.current_position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_position < self.entries.len()
    }

    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Interval at which the host should persist. The stack never acts on it.
    pub fn auto_persist_interval(&self) -> Option<Duration> {
        self.auto_persist_interval
    }

    pub fn set_auto_persist_interval(&mut self, interval: Option<Duration>) {
        self.auto_persist_interval = interval;
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Change the capacity, evicting the oldest entries if now over it
    pub fn set_max_history_size(&mut self, max_history_size: usize) {
        self.max_history_size = max_history_size.max(1);
        self.enforce_capacity();
    }

    /// Execute `command` and record it.
    ///
    /// On success the redo tail is discarded, the command is appended and
    /// the oldest entries are evicted if the stack is over capacity. A failed
    /// execution records nothing.
    pub fn execute_command(&mut self, ctx: &mut dyn MutationContext, mut command: Command) -> bool {
        if !command.execute(ctx) {
            return false;
        }

        if self.current_position < self.entries.len() {
            tracing::debug!(
                dropped = self.entries.len() - self.current_position,
                "discarding redo tail"
            );
            self.entries.truncate(self.current_position);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(HistoryEntry { seq, command });
        self.current_position += 1;
        self.enforce_capacity();

        tracing::debug!(
            seq,
            position = self.current_position,
            total = self.entries.len(),
            "command recorded"
        );
        true
    }

    /// Evict down to capacity. Only the applied prefix may leave from the
    /// front; anything still over after that comes off the end of the redo tail.
    fn enforce_capacity(&mut self) {
        if self.entries.len() <= self.max_history_size {
            return;
        }
        let excess = self.entries.len() - self.max_history_size;
        let front = excess.min(self.current_position);
        self.entries.drain(..front);
        self.current_position -= front;

        let tail = excess - front;
        self.entries.truncate(self.max_history_size);
        tracing::debug!(
            evicted = front,
            redo_dropped = tail,
            position = self.current_position,
            "evicted history entries over capacity"
        );
    }

    /// Undo the most recently applied entry
    pub fn undo(&mut self, ctx: &mut dyn MutationContext) -> bool {
        if self.current_position == 0 {
            return false;
        }
        let entry = &mut self.entries[self.current_position - 1];
        if !entry.command.undo(ctx) {
            return false;
        }
        self.current_position -= 1;
        tracing::debug!(position = self.current_position, "undo");
        true
    }

    /// Re-execute the first entry of the redo tail
    pub fn redo(&mut self, ctx: &mut dyn MutationContext) -> bool {
        if self.current_position == self.entries.len() {
            return false;
        }
        let entry = &mut self.entries[self.current_position];
        if !entry.command.execute(ctx) {
            return false;
        }
        self.current_position += 1;
        tracing::debug!(position = self.current_position, "redo");
        true
    }

    /// Walk to `target` (clamped to `0..=len`) one undo or redo at a time.
    ///
    /// If any step fails the walk is rolled back to the starting position and
    /// `false` is returned. If the rollback fails too, the stack stays where
    /// the rollback stopped; `current_position` always matches the buffer.
    pub fn jump_to(&mut self, ctx: &mut dyn MutationContext, target: usize) -> bool {
        let target = target.min(self.entries.len());
        let start = self.current_position;

        if self.walk_to(ctx, target) {
            tracing::debug!(from = start, to = target, "jumped");
            return true;
        }

        let reached = self.current_position;
        tracing::warn!(
            from = start,
            target,
            reached,
            "jump failed, rolling back"
        );
        if !self.walk_to(ctx, start) {
            tracing::error!(
                start,
                position = self.current_position,
                "rollback after failed jump did not complete"
            );
        }
        false
    }

    fn walk_to(&mut self, ctx: &mut dyn MutationContext, target: usize) -> bool {
        while self.current_position < target {
            if !self.redo(ctx) {
                return false;
            }
        }
        while self.current_position > target {
            if !self.undo(ctx) {
                return false;
            }
        }
        true
    }

    /// Drop every entry. The buffer is left as it is.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_position = 0;
        tracing::debug!("history cleared");
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_commands: self.entries.len(),
            current_position: self.current_position,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            memory_usage: self.entries.iter().map(|e| e.command.memory_usage()).sum(),
        }
    }

    pub fn list(&self) -> Vec<HistoryListItem> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| HistoryListItem {
                index,
                description: entry.command.description(),
                executed: entry.command.is_executed(),
                can_undo: entry.command.can_undo(),
            })
            .collect()
    }
}
