//! Reversible edit commands.
//!
//! A [`Command`] describes one insert, delete or replace. Executing it
//! captures the full buffer text first, so undo is a single wholesale
//! restore rather than a computed inverse edit.

use crate::util::text::{char_len, preview, slice_chars, splice};

use super::context::{ContextError, MutationContext};
use super::position::TextRange;

/// What a command does, with its construction-time parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Insert `text` at char offset `at`
    Insert { text: String, at: usize },
    /// Remove the chars in `range`
    Delete { range: TextRange },
    /// Replace the chars in `range` with `text`
    Replace { text: String, range: TextRange },
}

impl CommandKind {
    /// Short lowercase label, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::Insert { .. } => "insert",
            CommandKind::Delete { .. } => "delete",
            CommandKind::Replace { .. } => "replace",
        }
    }
}

/// State captured by the most recent successful execution
#[derive(Debug, Clone)]
struct Applied {
    /// Full buffer text before the edit
    snapshot: String,
    /// Text that the edit removed
    removed: String,
    /// Effective range after clamping to the buffer length
    range: TextRange,
    /// Cursor offset after the edit
    cursor_after: usize,
}

/// A reversible text mutation.
///
/// Lifecycle is a two-state machine: `execute` moves Unexecuted -> Executed,
/// `undo` moves Executed -> Unexecuted. Any other call is refused with `false`
/// and leaves the buffer untouched.
#[derive(Debug, Clone)]
pub struct Command {
    kind: CommandKind,
    executed: bool,
    applied: Option<Applied>,
}

impl Command {
    fn from_kind(kind: CommandKind) -> Self {
        Self {
            kind,
            executed: false,
            applied: None,
        }
    }

    /// Insert `text` at char offset `at`
    pub fn insert(text: impl Into<String>, at: usize) -> Self {
        Self::from_kind(CommandKind::Insert {
            text: text.into(),
            at,
        })
    }

    /// Delete chars `start..end` (a reversed pair is swapped)
    pub fn delete(start: usize, end: usize) -> Self {
        Self::from_kind(CommandKind::Delete {
            range: TextRange::new(start, end),
        })
    }

    /// Replace chars `start..end` with `text`
    pub fn replace(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self::from_kind(CommandKind::Replace {
            text: text.into(),
            range: TextRange::new(start, end),
        })
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    /// Range the command addresses, as constructed (before clamping)
    pub fn range(&self) -> TextRange {
        match &self.kind {
            CommandKind::Insert { at, .. } => TextRange::point(*at),
            CommandKind::Delete { range } | CommandKind::Replace { range, .. } => *range,
        }
    }

    /// Text the command puts into the buffer (empty for deletes)
    pub fn inserted_text(&self) -> &str {
        match &self.kind {
            CommandKind::Insert { text, .. } | CommandKind::Replace { text, .. } => text,
            CommandKind::Delete { .. } => "",
        }
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn can_undo(&self) -> bool {
        self.executed
    }

    /// Text removed by the last execution, if the command has run
    pub fn removed_text(&self) -> Option<&str> {
        self.applied.as_ref().map(|a| a.removed.as_str())
    }

    /// Cursor offset left by the last execution
    pub fn cursor_after(&self) -> Option<usize> {
        self.applied.as_ref().map(|a| a.cursor_after)
    }

    /// Change in buffer length (in chars) caused by this command.
    ///
    /// Uses the actually removed text once executed, the nominal range before.
    pub fn length_delta(&self) -> isize {
        let inserted = char_len(self.inserted_text()) as isize;
        let removed = match &self.applied {
            Some(applied) => char_len(&applied.removed),
            None => match &self.kind {
                CommandKind::Insert { .. } => 0,
                CommandKind::Delete { range } | CommandKind::Replace { range, .. } => range.len(),
            },
        };
        inserted - removed as isize
    }

    /// Approximate bytes held by this command for undo
    pub fn memory_usage(&self) -> usize {
        let captured = self
            .applied
            .as_ref()
            .map(|a| a.snapshot.len() + a.removed.len())
            .unwrap_or(0);
        captured + self.inserted_text().len()
    }

    /// Apply the edit. Returns `false` without touching the buffer if the
    /// command is already executed or the context fails.
    pub fn execute(&mut self, ctx: &mut dyn MutationContext) -> bool {
        if self.executed {
            tracing::debug!(kind = self.kind.label(), "execute refused: already executed");
            return false;
        }

        match self.apply(ctx) {
            Ok(applied) => {
                ctx.set_cursor(applied.cursor_after);
                tracing::debug!(
                    kind = self.kind.label(),
                    range = %applied.range,
                    cursor = applied.cursor_after,
                    "executed"
                );
                self.applied = Some(applied);
                self.executed = true;
                true
            }
            Err(e) => {
                tracing::warn!(kind = self.kind.label(), error = %e, "execute failed");
                false
            }
        }
    }

    fn apply(&self, ctx: &mut dyn MutationContext) -> Result<Applied, ContextError> {
        let before = ctx.text()?;
        let len = char_len(&before);

        let range = self.range().clamp_to(len);
        let inserted = self.inserted_text();

        let removed = slice_chars(&before, range.start(), range.end()).to_string();
        let after = splice(&before, range.start(), range.end(), inserted);
        ctx.set_text(after)?;

        Ok(Applied {
            snapshot: before,
            removed,
            range,
            cursor_after: range.start() + char_len(inserted),
        })
    }

    /// Restore the buffer captured by the matching `execute`.
    ///
    /// Inserts put the cursor back at the insertion point; deletes and
    /// replaces select the affected range.
    pub fn undo(&mut self, ctx: &mut dyn MutationContext) -> bool {
        if !self.executed {
            tracing::debug!(kind = self.kind.label(), "undo refused: not executed");
            return false;
        }
        let Some(applied) = &self.applied else {
            return false;
        };

        if let Err(e) = ctx.set_text(applied.snapshot.clone()) {
            tracing::warn!(kind = self.kind.label(), error = %e, "undo failed");
            return false;
        }

        match self.kind {
            CommandKind::Insert { .. } => ctx.set_cursor(applied.range.start()),
            CommandKind::Delete { .. } | CommandKind::Replace { .. } => {
                ctx.set_selection(applied.range)
            }
        }

        tracing::debug!(kind = self.kind.label(), range = %applied.range, "undone");
        self.executed = false;
        true
    }

    /// Human-readable summary with a truncated preview of the affected text
    pub fn description(&self) -> String {
        let range = self
            .applied
            .as_ref()
            .map(|a| a.range)
            .unwrap_or_else(|| self.range());

        match (&self.kind, self.removed_text()) {
            (CommandKind::Insert { text, .. }, _) => {
                format!("Insert \"{}\" at {}", preview(text), range.start())
            }
            (CommandKind::Delete { .. }, Some(removed)) => {
                format!("Delete \"{}\" at {}", preview(removed), range)
            }
            (CommandKind::Delete { .. }, None) => format!("Delete {}", range),
            (CommandKind::Replace { text, .. }, Some(removed)) => format!(
                "Replace \"{}\" with \"{}\" at {}",
                preview(removed),
                preview(text),
                range
            ),
            (CommandKind::Replace { text, .. }, None) => {
                format!("Replace {} with \"{}\"", range, preview(text))
            }
        }
    }
}
