//! Decisions an operator makes about individual records during a run.
//!
//! Runs are either scripted (answers come from [`RunConfig`]) or interactive
//! (answers are typed on the terminal).

use console::Term;
use tracing::debug;

use crate::{
    config::{CollectionRules, EntityType, RunConfig},
    record::DescriptionRecord,
};

/// The record a question is about.
pub struct Prompt<'r> {
    /// 1-based row in the description table.
    pub row: usize,
    /// Title as it will appear in the product table.
    pub title: &'r str,
    pub record: &'r DescriptionRecord,
}

pub trait Operator {
    /// Whether a non-leaf record should become a repository collection.
    fn is_collection(&self, prompt: &Prompt<'_>) -> bool;

    /// Agent name for a record whose agent fields are empty or `NULL`.
    fn authorized_name(&self, prompt: &Prompt<'_>, entity: EntityType) -> Option<String>;
}

/// Answers derived from configuration only.
pub struct ScriptedOperator {
    rules: CollectionRules,
}

impl ScriptedOperator {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            rules: config.collections.clone(),
        }
    }
}

impl Operator for ScriptedOperator {
    fn is_collection(&self, prompt: &Prompt<'_>) -> bool {
        let level = prompt.record.level_of_description.trim();
        let id = prompt.record.legacy_id.trim();
        self.rules.levels.iter().any(|l| l.trim() == level)
            || (!id.is_empty() && self.rules.ids.iter().any(|i| i.trim() == id))
    }

    fn authorized_name(&self, _prompt: &Prompt<'_>, _entity: EntityType) -> Option<String> {
        None
    }
}

/// Answers typed by the operator on the controlling terminal.
pub struct ConsoleOperator {
    term: Term,
}

impl Default for ConsoleOperator {
    fn default() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl ConsoleOperator {
    fn ask(&self, question: &str) -> Option<String> {
        self.term.write_line(question).ok()?;
        self.term
            .read_line()
            .map(|answer| answer.trim().to_owned())
            .ok()
    }
}

impl Operator for ConsoleOperator {
    fn is_collection(&self, prompt: &Prompt<'_>) -> bool {
        let question = format!(
            "\nRow {}: levelOfDescription is '{}'. Treat as collection? (y/n)\nTitle: {}",
            prompt.row,
            prompt.record.level_of_description.trim(),
            prompt.title
        );
        let answer = self.ask(&question);
        debug!(row = prompt.row, ?answer, "collection prompt");
        answer.is_some_and(|answer| answer.eq_ignore_ascii_case("y"))
    }

    fn authorized_name(&self, prompt: &Prompt<'_>, entity: EntityType) -> Option<String> {
        let question = format!(
            "\nRow {}: The {} field is empty or NULL for record '{}'.\n\
             Please copy the 'Authorized form of name' from AtoM to populate this field \
             (or press Enter to leave blank):",
            prompt.row,
            entity.column(),
            prompt.title
        );
        self.ask(&question).filter(|name| !name.is_empty())
    }
}

/// Build the operator a run asks.
pub fn for_config(config: &RunConfig) -> Box<dyn Operator> {
    if config.interactive {
        Box::new(ConsoleOperator::default())
    } else {
        Box::new(ScriptedOperator::new(config))
    }
}
