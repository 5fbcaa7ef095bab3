//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use revise::history::{Command, ContextError, HistoryStack, MutationContext, StringContext, TextRange};
use revise::notify::{CallbackObserver, ChangeEvent, Observer};

/// Context whose writes can be made to fail on demand
#[derive(Debug)]
pub struct FlakyContext {
    pub inner: StringContext,
    blocked: bool,
    writes: usize,
    failing: Vec<usize>,
}

impl FlakyContext {
    pub fn new(text: &str) -> Self {
        Self {
            inner: StringContext::new(text),
            blocked: false,
            writes: 0,
            failing: Vec::new(),
        }
    }

    /// Fail every write until `unblock_writes`
    pub fn block_writes(&mut self) {
        self.blocked = true;
    }

    pub fn unblock_writes(&mut self) {
        self.blocked = false;
    }

    /// Fail the given upcoming writes, numbered from 1 starting now
    pub fn fail_writes(&mut self, upcoming: &[usize]) {
        self.failing = upcoming.iter().map(|n| self.writes + n).collect();
    }

    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }
}

impl MutationContext for FlakyContext {
    fn text(&self) -> Result<String, ContextError> {
        self.inner.text()
    }

    fn set_text(&mut self, text: String) -> Result<(), ContextError> {
        self.writes += 1;
        if self.blocked || self.failing.contains(&self.writes) {
            return Err(ContextError::Io("disk full".to_string()));
        }
        self.inner.set_text(text)
    }

    fn set_cursor(&mut self, offset: usize) {
        self.inner.set_cursor(offset);
    }

    fn set_selection(&mut self, range: TextRange) {
        self.inner.set_selection(range);
    }
}

/// Append each of `texts` to the end of the buffer as a separate command
pub fn push_appends(stack: &mut HistoryStack, ctx: &mut dyn MutationContext, texts: &[&str]) {
    for text in texts {
        let at = ctx.text().unwrap().chars().count();
        assert!(stack.execute_command(ctx, Command::insert(*text, at)));
    }
}

/// Simple event keyed by a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub key: String,
    pub payload: u32,
}

impl Event {
    pub fn new(key: &str, payload: u32) -> Self {
        Self {
            key: key.to_string(),
            payload,
        }
    }
}

impl ChangeEvent for Event {
    fn key(&self) -> &str {
        &self.key
    }
}

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Observer that records `"<id>:<key>:<payload>"` for each event
pub fn recorder(id: &str, log: &Log) -> Box<dyn Observer<Event>> {
    let log = Rc::clone(log);
    let name = id.to_string();
    Box::new(CallbackObserver::new(id, move |e: &Event| {
        log.borrow_mut()
            .push(format!("{}:{}:{}", name, e.key, e.payload));
        Ok(())
    }))
}

/// Observer whose every update fails
pub fn failing(id: &str) -> Box<dyn Observer<Event>> {
    Box::new(CallbackObserver::new(id, |e: &Event| {
        anyhow::bail!("cannot handle {}", e.key)
    }))
}
