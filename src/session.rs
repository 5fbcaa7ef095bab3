//! An editing session: one buffer, its history and its config.
//!
//! Sessions are constructed explicitly and passed to whoever needs them;
//! there is no process-wide instance. Config changes made through the
//! session are announced on its broadcaster.

use std::time::Duration;

use crate::config::EngineConfig;
use crate::history::{
    Command, HistoryListItem, HistoryStack, HistoryStats, StringContext, TextRange,
};
use crate::notify::{BroadcastError, Broadcaster, ConfigChange, KeyFilter, Observer};

/// Config key announced when the history limit changes
pub const KEY_MAX_HISTORY_SIZE: &str = "max_history_size";
/// Config key announced when the auto-persist interval changes
pub const KEY_AUTO_PERSIST_INTERVAL: &str = "auto_persist_interval_secs";

pub struct EditSession {
    context: StringContext,
    history: HistoryStack,
    config: EngineConfig,
    broadcaster: Broadcaster<ConfigChange>,
}

impl EditSession {
    pub fn new(text: &str, config: EngineConfig) -> Self {
        Self {
            context: StringContext::new(text),
            history: HistoryStack::from_config(&config),
            broadcaster: Broadcaster::new(config.max_observers),
            config,
        }
    }

    pub fn text(&self) -> &str {
        self.context.as_str()
    }

    pub fn cursor(&self) -> usize {
        self.context.cursor()
    }

    pub fn selection(&self) -> Option<TextRange> {
        self.context.selection()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn context_mut(&mut self) -> &mut StringContext {
        &mut self.context
    }

    /// Execute `command` against the session buffer and record it
    pub fn execute(&mut self, command: Command) -> bool {
        self.history.execute_command(&mut self.context, command)
    }

    pub fn insert(&mut self, text: &str, at: usize) -> bool {
        self.execute(Command::insert(text, at))
    }

    pub fn delete(&mut self, start: usize, end: usize) -> bool {
        self.execute(Command::delete(start, end))
    }

    pub fn replace(&mut self, text: &str, start: usize, end: usize) -> bool {
        self.execute(Command::replace(text, start, end))
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.context)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.context)
    }

    pub fn jump_to(&mut self, target: usize) -> bool {
        self.history.jump_to(&mut self.context, target)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    pub fn history_list(&self) -> Vec<HistoryListItem> {
        self.history.list()
    }

    /// Change the history limit, evicting old entries, and announce it
    pub fn set_max_history_size(&mut self, max_history_size: usize) {
        let old = self.config.max_history_size;
        self.history.set_max_history_size(max_history_size);
        self.config.max_history_size = self.history.max_history_size();

        if old != self.config.max_history_size {
            self.broadcaster.notify(&ConfigChange::new(
                KEY_MAX_HISTORY_SIZE,
                old,
                self.config.max_history_size,
            ));
        }
    }

    /// Change the auto-persist interval and announce it
    pub fn set_auto_persist_interval(&mut self, secs: Option<u64>) {
        let old = self.config.auto_persist_interval_secs;
        if old == secs {
            return;
        }
        self.config.auto_persist_interval_secs = secs;
        self.history
            .set_auto_persist_interval(secs.map(Duration::from_secs));
        self.broadcaster
            .notify(&ConfigChange::new(KEY_AUTO_PERSIST_INTERVAL, old, secs));
    }

    /// Subscribe to config changes
    pub fn subscribe(
        &mut self,
        observer: Box<dyn Observer<ConfigChange>>,
    ) -> Result<bool, BroadcastError> {
        self.broadcaster.attach(observer)
    }

    /// Subscribe to changes of the listed config keys only
    pub fn subscribe_to<I, S>(
        &mut self,
        observer: Box<dyn Observer<ConfigChange>>,
        keys: I,
    ) -> Result<bool, BroadcastError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.broadcaster
            .attach_filtered(observer, KeyFilter::keys(keys))
    }

    pub fn subscriptions(&self) -> &Broadcaster<ConfigChange> {
        &self.broadcaster
    }

    pub fn subscriptions_mut(&mut self) -> &mut Broadcaster<ConfigChange> {
        &mut self.broadcaster
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new("", EngineConfig::default())
    }
}
