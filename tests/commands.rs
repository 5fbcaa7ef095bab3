//! Command tests - insert, delete, replace and their undo

mod common;

use common::FlakyContext;
use revise::history::{Command, CommandKind, MutationContext, RopeContext, StringContext, TextRange};

fn roundtrip(initial: &str, mut cmd: Command) {
    let mut ctx = StringContext::new(initial);
    assert!(cmd.execute(&mut ctx), "execute failed for {:?}", cmd.kind());
    assert!(cmd.undo(&mut ctx), "undo failed for {:?}", cmd.kind());
    assert_eq!(ctx.as_str(), initial, "round trip mismatch for {:?}", cmd.kind());
}

// ========================================================================
// Scenarios
// ========================================================================

#[test]
fn test_insert_scenario() {
    let mut ctx = StringContext::new("Hello World");
    let mut cmd = Command::insert("XYZ", 5);

    assert!(cmd.execute(&mut ctx));
    assert_eq!(ctx.as_str(), "HelloXYZ World");
    assert_eq!(ctx.cursor(), 8);

    assert!(cmd.undo(&mut ctx));
    assert_eq!(ctx.as_str(), "Hello World");
    assert_eq!(ctx.cursor(), 5);
}

#[test]
fn test_delete_scenario() {
    let mut ctx = StringContext::new("Hello World!");
    let mut cmd = Command::delete(5, 8);

    assert!(cmd.execute(&mut ctx));
    assert_eq!(ctx.as_str(), "Hello orld!");
    assert_eq!(cmd.removed_text(), Some(" Wo"));
    assert_eq!(ctx.cursor(), 5);
}

#[test]
fn test_replace_scenario() {
    let mut ctx = StringContext::new("Hello World!");
    let mut cmd = Command::replace("New", 6, 11);

    assert!(cmd.execute(&mut ctx));
    assert_eq!(ctx.as_str(), "Hello New!");
    assert_eq!(ctx.cursor(), 9);
    assert_eq!(cmd.length_delta(), -2);
    assert_eq!(cmd.cursor_after(), Some(9));
}

// ========================================================================
// Round trips
// ========================================================================

#[test]
fn test_roundtrip_each_variant() {
    let buffers = ["", "a", "Hello World!", "line one\nline two\n", "naïve café 日本語"];
    for buffer in buffers {
        let len = buffer.chars().count();
        roundtrip(buffer, Command::insert("++", 0));
        roundtrip(buffer, Command::insert("++", len));
        roundtrip(buffer, Command::insert("++", len / 2));
        roundtrip(buffer, Command::delete(0, len));
        roundtrip(buffer, Command::delete(len / 2, len + 10));
        roundtrip(buffer, Command::replace("~", 1, len));
        roundtrip(buffer, Command::replace("", 0, 0));
    }
}

#[test]
fn test_undo_restores_selection_for_delete_and_replace() {
    let mut ctx = StringContext::new("abcdefgh");
    let mut delete = Command::delete(2, 5);
    delete.execute(&mut ctx);
    delete.undo(&mut ctx);
    assert_eq!(ctx.selection(), Some(TextRange::new(2, 5)));

    let mut replace = Command::replace("XY", 1, 3);
    replace.execute(&mut ctx);
    replace.undo(&mut ctx);
    assert_eq!(ctx.selection(), Some(TextRange::new(1, 3)));
}

#[test]
fn test_unicode_offsets_are_chars() {
    let mut ctx = StringContext::new("日本語テキスト");
    let mut cmd = Command::replace("ご", 1, 3);
    assert!(cmd.execute(&mut ctx));
    assert_eq!(ctx.as_str(), "日ごテキスト");
    assert_eq!(cmd.removed_text(), Some("本語"));
    assert_eq!(ctx.cursor(), 2);
}

// ========================================================================
// Lifecycle
// ========================================================================

#[test]
fn test_reversed_range_is_normalized() {
    let cmd = Command::delete(8, 5);
    assert_eq!(cmd.range(), TextRange::new(5, 8));
    assert_eq!(cmd.kind(), &CommandKind::Delete { range: TextRange::new(5, 8) });
}

#[test]
fn test_undo_without_execute() {
    let mut ctx = StringContext::new("unchanged");
    let mut cmd = Command::replace("x", 0, 3);
    assert!(!cmd.undo(&mut ctx));
    assert_eq!(ctx.as_str(), "unchanged");
}

#[test]
fn test_double_undo_fails_second_time() {
    let mut ctx = StringContext::new("abc");
    let mut cmd = Command::delete(0, 1);
    cmd.execute(&mut ctx);
    assert!(cmd.undo(&mut ctx));
    assert!(!cmd.undo(&mut ctx));
    assert_eq!(ctx.as_str(), "abc");
}

#[test]
fn test_double_execute_does_not_reapply() {
    let mut ctx = StringContext::new("abc");
    let mut cmd = Command::insert("!", 3);
    assert!(cmd.execute(&mut ctx));
    assert!(!cmd.execute(&mut ctx));
    assert_eq!(ctx.as_str(), "abc!");
}

#[test]
fn test_execute_failure_is_absorbed() {
    let mut ctx = FlakyContext::new("abc");
    ctx.block_writes();
    let mut cmd = Command::insert("x", 0);
    assert!(!cmd.execute(&mut ctx));
    assert!(!cmd.can_undo());
    assert_eq!(ctx.as_str(), "abc");
}

#[test]
fn test_undo_failure_keeps_executed_state() {
    let mut ctx = FlakyContext::new("abc");
    let mut cmd = Command::insert("x", 0);
    assert!(cmd.execute(&mut ctx));
    ctx.block_writes();
    assert!(!cmd.undo(&mut ctx));
    assert!(cmd.is_executed());
    assert_eq!(ctx.as_str(), "xabc");

    ctx.unblock_writes();
    assert!(cmd.undo(&mut ctx));
    assert_eq!(ctx.as_str(), "abc");
}

#[test]
fn test_commands_on_rope_context() {
    let mut ctx = RopeContext::new("fn main() {\n}\n");
    let mut cmd = Command::insert("    println!(\"hi\");\n", 12);
    assert!(cmd.execute(&mut ctx));
    assert_eq!(ctx.text().unwrap(), "fn main() {\n    println!(\"hi\");\n}\n");
    assert_eq!(ctx.cursor_line_col(), (2, 0));

    assert!(cmd.undo(&mut ctx));
    assert_eq!(ctx.rope().to_string(), "fn main() {\n}\n");
}

#[test]
fn test_long_text_description_is_truncated() {
    let cmd = Command::insert("The quick brown fox jumps over the lazy dog", 0);
    assert_eq!(cmd.description(), "Insert \"The quick brown fox ...\" at 0");
}
