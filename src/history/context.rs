//! Mutation context: the narrow surface commands use to touch a buffer.
//!
//! Commands never see a concrete buffer type. They read the full text,
//! write it back wholesale, and optionally move the cursor or selection.
//! Hosts that don't track a cursor simply keep the default no-op setters.

use ropey::Rope;

use super::position::TextRange;

/// Errors a host can raise while a command reads or writes its buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The buffer does not accept writes
    ReadOnly,
    /// The host refused the new content
    Rejected(String),
    /// Backing storage failed
    Io(String),
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "buffer is read-only"),
            Self::Rejected(reason) => write!(f, "edit rejected: {}", reason),
            Self::Io(msg) => write!(f, "buffer I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ContextError {}

/// Capability set a command needs to read and change buffer state.
pub trait MutationContext {
    /// Current buffer text
    fn text(&self) -> Result<String, ContextError>;

    /// Replace the buffer text wholesale
    fn set_text(&mut self, text: String) -> Result<(), ContextError>;

    /// Move the cursor to a char offset. No-op unless the host wires it.
    fn set_cursor(&mut self, _offset: usize) {}

    /// Select a char range. No-op unless the host wires it.
    fn set_selection(&mut self, _range: TextRange) {}
}

// =============================================================================
// StringContext - small buffers and tests
// =============================================================================

/// `MutationContext` backed by a `String`, tracking cursor and selection.
#[derive(Debug, Clone, Default)]
pub struct StringContext {
    text: String,
    cursor: usize,
    selection: Option<TextRange>,
    read_only: bool,
}

impl StringContext {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Last cursor offset set by a command
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Last selection set by a command, cleared whenever the cursor moves
    pub fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    /// Make subsequent writes fail with [`ContextError::ReadOnly`]
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl MutationContext for StringContext {
    fn text(&self) -> Result<String, ContextError> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: String) -> Result<(), ContextError> {
        if self.read_only {
            return Err(ContextError::ReadOnly);
        }
        self.text = text;
        Ok(())
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset;
        self.selection = None;
    }

    fn set_selection(&mut self, range: TextRange) {
        self.selection = Some(range);
        self.cursor = range.end();
    }
}

// =============================================================================
// RopeContext - multi-line documents
// =============================================================================

/// `MutationContext` backed by a `ropey::Rope` for large documents.
#[derive(Debug, Clone)]
pub struct RopeContext {
    rope: Rope,
    cursor: usize,
    selection: Option<TextRange>,
}

impl RopeContext {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: 0,
            selection: None,
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    /// Cursor as a 0-indexed (line, column) pair
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let offset = self.cursor.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }
}

impl Default for RopeContext {
    fn default() -> Self {
        Self::new("")
    }
}

impl MutationContext for RopeContext {
    fn text(&self) -> Result<String, ContextError> {
        Ok(self.rope.to_string())
    }

    fn set_text(&mut self, text: String) -> Result<(), ContextError> {
        self.rope = Rope::from(text);
        Ok(())
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset;
        self.selection = None;
    }

    fn set_selection(&mut self, range: TextRange) {
        self.selection = Some(range);
        self.cursor = range.end();
    }
}
