//! Mapping of raw AtoM description fields onto product-table columns.
//!
//! Everything here is independent of how (or whether) the record matched an asset.

use std::sync::LazyLock;

use itertools::Itertools;

use crate::{
    config::RunConfig,
    operator::{Operator, Prompt},
    record::DescriptionRecord,
};

static EVENT_TYPE_SEPARATOR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s*[|;,]\s*").unwrap());

static EXTENT_BULLET: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\*\s*").unwrap());

/// Locator prefixes that are appended to the title.
const TITLED_LOCATOR_PREFIXES: &[&str] = &["V", "MI", "SR"];

/// Descriptive columns shared by every row built from one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptiveFields {
    pub title: String,
    pub language: String,
    pub local_identifier: String,
    pub agents: String,
    pub description: String,
    pub origin_information: String,
    pub extent: String,
    pub physical_location: String,
    pub shelf_locator: String,
}

/// MARC relator code for an AtoM event type.
pub fn relator_code(event_type: &str) -> &'static str {
    match event_type {
        "Creation" => "cre",
        "Receipt" => "rcp",
        "Collection" | "Accumulation" | "Custody" => "col",
        "Production" => "pro",
        "Published" | "Publisher" => "pbl",
        "Interview" => "ivr",
        "Performance" => "prf",
        _ => "oth",
    }
}

/// `|relators:cre,pbl` for the record's event types, or empty when there are none.
pub fn relator_suffix(event_types: &str) -> String {
    let codes = EVENT_TYPE_SEPARATOR
        .split(event_types)
        .map(str::trim)
        .filter(|event_type| !event_type.is_empty())
        .map(relator_code)
        .join(",");
    if codes.is_empty() {
        codes
    } else {
        format!("|relators:{codes}")
    }
}

/// Event actors plus the first non-empty responsibility statement, joined by `; `.
pub fn compose_agents(record: &DescriptionRecord) -> String {
    let actors = record.event_actors.trim();
    let responsibility = [
        &record.statement_of_responsibility,
        &record.statement_of_responsibility_note,
        &record.attributions_and_conjectures,
        &record.note_accompanying_material,
    ]
    .into_iter()
    .find(|field| !field.is_empty())
    .map(|field| field.trim())
    .unwrap_or_default();
    match (actors.is_empty(), responsibility.is_empty()) {
        (false, false) => format!("{actors}; {responsibility}"),
        (false, true) => actors.to_owned(),
        _ => responsibility.to_owned(),
    }
}

/// Append `suffix` to every `;`-separated agent entry.
pub fn annotate_agents(agents: &str, suffix: &str) -> String {
    agents
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| format!("{entry}{suffix}"))
        .join("; ")
}

/// `start/end`, or whichever bound exists; a single date when both agree.
pub fn origin_information(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (start, "") => start.to_owned(),
        ("", end) => end.to_owned(),
        (start, end) if start == end => start.to_owned(),
        (start, end) => format!("{start}/{end}"),
    }
}

/// One line per extent statement, bullets removed, joined with `, `.
pub fn reformat_extent(extent: &str) -> String {
    extent
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| EXTENT_BULLET.replace(line, "").trim().to_owned())
        .join(", ")
}

/// Append recognized locators to the title, or use the locator alone.
pub fn augment_title(title: &str, locator: &str) -> String {
    let title = title.trim();
    let locator = locator.trim();
    let recognized = TITLED_LOCATOR_PREFIXES
        .iter()
        .any(|prefix| locator.starts_with(prefix));
    match (recognized, title.is_empty()) {
        (true, false) => format!("{title} - {locator}"),
        (true, true) => locator.to_owned(),
        (false, _) => title.to_owned(),
    }
}

pub struct FieldTransformer<'a> {
    config: &'a RunConfig,
    operator: &'a dyn Operator,
}

impl<'a> FieldTransformer<'a> {
    pub fn new(config: &'a RunConfig, operator: &'a dyn Operator) -> Self {
        Self { config, operator }
    }

    /// Agent column: composed agents, falling back to the uniform name or the operator.
    fn agents(&self, row: usize, title: &str, record: &DescriptionRecord) -> String {
        let mut agents = compose_agents(record);
        if agents.is_empty() || agents.eq_ignore_ascii_case("NULL") {
            agents = match self.config.uniform_agent_name() {
                Some(name) => name.to_owned(),
                None => self
                    .operator
                    .authorized_name(&Prompt { row, title, record }, self.config.entity_type)
                    .unwrap_or_default(),
            };
        }
        annotate_agents(&agents, &relator_suffix(&record.event_types))
    }

    pub fn transform(&self, row: usize, record: &DescriptionRecord) -> DescriptiveFields {
        let title = augment_title(&record.title, record.locator());
        DescriptiveFields {
            agents: self.agents(row, &title, record),
            language: self.config.language.clone(),
            local_identifier: record.reference_code.clone(),
            description: record.scope_and_content.clone(),
            origin_information: origin_information(
                &record.event_start_dates,
                &record.event_end_dates,
            ),
            extent: reformat_extent(&record.extent_and_medium),
            physical_location: record.repository.clone(),
            shelf_locator: record.physical_object_location.clone(),
            title,
        }
    }
}
