//! Character-unit helpers for text edits
//!
//! All offsets handled by the history engine count `char`s, never bytes.
//! These helpers translate between the two and clamp out-of-range offsets
//! the same way string slicing does: past-the-end means "to the end".

/// Maximum number of characters shown in a command description preview
pub const PREVIEW_MAX_CHARS: usize = 20;

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a char offset to a byte offset, clamping to the end of `text`
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Substring covering chars `start..end`, clamped to the text length
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end.max(start));
    &text[start_byte..end_byte]
}

/// Build `text[..start] + insert + text[end..]` in char units.
///
/// Offsets beyond the text are clamped, so splicing at or past the end appends.
pub fn splice(text: &str, start: usize, end: usize, insert: &str) -> String {
    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end.max(start));

    let mut out = String::with_capacity(text.len() - (end_byte - start_byte) + insert.len());
    out.push_str(&text[..start_byte]);
    out.push_str(insert);
    out.push_str(&text[end_byte..]);
    out
}

/// Short, single-line preview of `text` for display in history lists
pub fn preview(text: &str) -> String {
    let mut out = String::new();
    for (i, ch) in text.chars().enumerate() {
        if i == PREVIEW_MAX_CHARS {
            out.push_str("...");
            break;
        }
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
