//! Declarative edit scripts
//!
//! A script is a YAML document with an initial text and a list of steps:
//!
//! ```yaml
//! text: "Hello World"
//! steps:
//!   - op: insert
//!     text: "XYZ"
//!     at: 5
//!   - op: delete
//!     start: 5
//!     end: 8
//!   - op: undo
//!   - op: jump
//!     to: 0
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::session::EditSession;

/// One action in a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Insert { text: String, at: usize },
    Delete { start: usize, end: usize },
    Replace { text: String, start: usize, end: usize },
    Undo,
    Redo,
    Jump { to: usize },
    Clear,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Insert { text, at } => write!(f, "insert {:?} at {}", text, at),
            Step::Delete { start, end } => write!(f, "delete {}..{}", start, end),
            Step::Replace { text, start, end } => {
                write!(f, "replace {}..{} with {:?}", start, end, text)
            }
            Step::Undo => write!(f, "undo"),
            Step::Redo => write!(f, "redo"),
            Step::Jump { to } => write!(f, "jump to {}", to),
            Step::Clear => write!(f, "clear history"),
        }
    }
}

/// Result of running one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    pub ok: bool,
    /// Buffer text after the step
    pub text: String,
    pub position: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse edit script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid script {}", path.display()))
    }

    /// Fresh session seeded with the script's initial text
    pub fn session(&self, config: EngineConfig) -> EditSession {
        EditSession::new(&self.text, config)
    }

    /// Apply every step in order. A failed step is recorded and the run continues.
    pub fn run(&self, session: &mut EditSession) -> Vec<StepOutcome> {
        self.steps
            .iter()
            .map(|step| {
                let ok = apply_step(session, step);
                if !ok {
                    tracing::info!(%step, "step had no effect");
                }
                StepOutcome {
                    step: step.clone(),
                    ok,
                    text: session.text().to_string(),
                    position: session.history().current_position(),
                }
            })
            .collect()
    }
}

fn apply_step(session: &mut EditSession, step: &Step) -> bool {
    match step {
        Step::Insert { text, at } => session.insert(text, *at),
        Step::Delete { start, end } => session.delete(*start, *end),
        Step::Replace { text, start, end } => session.replace(text, *start, *end),
        Step::Undo => session.undo(),
        Step::Redo => session.redo(),
        Step::Jump { to } => session.jump_to(*to),
        Step::Clear => {
            session.clear_history();
            true
        }
    }
}
