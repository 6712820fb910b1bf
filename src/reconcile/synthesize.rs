//! Turning description records into product rows: collections, compound
//! parents with their children, and single matched (or unmatched) items.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{
    compound,
    fields::{DescriptiveFields, FieldTransformer},
    resolver::Resolver,
    side_label,
};
use crate::{
    config::RunConfig,
    operator::{Operator, Prompt},
    progress::{EntryStatus, ProgressReporter},
    record::{AssetRecord, DescriptionRecord, MediaKind, ProductRow, model_and_resource_type},
    report::{Diagnostics, DuplicateId, Unmatched},
    table::AssetTable,
};

/// Sequential ids for compound children, skipping every id already in use.
#[derive(Debug)]
pub struct IdAllocator {
    next: u64,
    taken: HashSet<String>,
}

impl IdAllocator {
    pub fn new(start: u64, taken: HashSet<String>) -> Self {
        Self { next: start, taken }
    }

    /// Start one past the largest numeric id in `taken`, or at 1 when there is
    /// none or it is already `u64::MAX`.
    pub fn after(taken: HashSet<String>) -> Self {
        let start = taken
            .iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .and_then(|max| max.checked_add(1))
            .unwrap_or(1);
        Self::new(start, taken)
    }

    /// Next free id; wraps to 1 after `u64::MAX`.
    pub fn allocate(&mut self) -> String {
        loop {
            let id = self.next.to_string();
            self.next = self.next.checked_add(1).unwrap_or(1);
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// Result of one synthesis run.
#[derive(Debug, Default)]
pub struct Synthesis {
    pub rows: Vec<ProductRow>,
    pub diagnostics: Diagnostics,
}

/// A record with its id, transformed fields and collection decision.
struct Prepared<'r> {
    row: usize,
    id: String,
    record: &'r DescriptionRecord,
    fields: DescriptiveFields,
    collection: bool,
}

impl Prepared<'_> {
    fn entry(&self) -> String {
        format!("row {} ({})", self.row, self.id)
    }

    fn product_row(&self) -> ProductRow {
        let DescriptiveFields {
            title,
            language,
            local_identifier,
            agents,
            description,
            origin_information,
            extent,
            physical_location,
            shelf_locator,
        } = self.fields.clone();
        ProductRow {
            source_row: self.row,
            id: self.id.clone(),
            title,
            language,
            local_identifier,
            agents,
            description,
            origin_information,
            extent,
            physical_location,
            shelf_locator,
            ..Default::default()
        }
    }
}

/// Rows emitted so far and the ids they used.
#[derive(Default)]
struct Output {
    rows: Vec<ProductRow>,
    written: HashSet<String>,
    diagnostics: Diagnostics,
}

impl Output {
    /// Push `row` unless its id was already written.
    fn emit(&mut self, row: ProductRow) -> bool {
        if !self.written.insert(row.id.clone()) {
            warn!(row = row.source_row, id = %row.id, "duplicate id, record skipped");
            self.diagnostics.duplicate_ids.push(DuplicateId {
                row: row.source_row,
                id: row.id,
            });
            return false;
        }
        self.rows.push(row);
        true
    }
}

/// `"{title} - {label}"`, or whichever part is non-empty.
fn child_title(title: &str, label: &str) -> String {
    match (title.is_empty(), label.is_empty()) {
        (false, false) => format!("{title} - {label}"),
        (true, _) => label.to_owned(),
        (false, true) => title.to_owned(),
    }
}

pub struct Synthesizer<'a> {
    config: &'a RunConfig,
    operator: &'a dyn Operator,
    assets: &'a AssetTable,
    resolver: Resolver<'a>,
    progress: &'a dyn ProgressReporter,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        config: &'a RunConfig,
        operator: &'a dyn Operator,
        assets: &'a AssetTable,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            config,
            operator,
            assets,
            resolver: Resolver::new(assets),
            progress,
        }
    }

    fn prepare<'r>(&self, records: &'r [DescriptionRecord]) -> Vec<Prepared<'r>> {
        let transformer = FieldTransformer::new(self.config, self.operator);
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let row = index + 2;
                let legacy_id = record.legacy_id.trim();
                let id = if legacy_id.is_empty() {
                    row.to_string()
                } else {
                    legacy_id.to_owned()
                };
                let fields = transformer.transform(row, record);
                let collection = !record.is_leaf_level()
                    && self.operator.is_collection(&Prompt {
                        row,
                        title: &fields.title,
                        record,
                    });
                Prepared {
                    row,
                    id,
                    record,
                    fields,
                    collection,
                }
            })
            .collect()
    }

    fn digital_file(&self, asset: &AssetRecord) -> String {
        format!("{}{}", self.config.archive_uri_prefix, asset.file_name)
    }

    /// Fill the file columns of `row` from `asset`.
    fn attach(&self, row: &mut ProductRow, asset: &AssetRecord) {
        let (model, resource_type) = model_and_resource_type(&asset.mime_type);
        row.model = model.into();
        row.resource_type = resource_type.into();
        row.digital_file = self.digital_file(asset);
        row.mime = asset.mime_type.clone();
    }

    /// Run the collection pre-pass, then compounds, then singles.
    pub fn synthesize(&self, records: &[DescriptionRecord]) -> Synthesis {
        let prepared = self.prepare(records);
        let collections = prepared
            .iter()
            .filter(|p| p.collection)
            .map(|p| p.id.as_str())
            .collect::<HashSet<_>>();
        let parent_of = |record: &DescriptionRecord| -> (String, String) {
            let parent_id = record.parent_id.trim();
            if !parent_id.is_empty() && collections.contains(parent_id) {
                (String::new(), parent_id.to_owned())
            } else {
                (self.config.default_parent_id.clone(), String::new())
            }
        };
        let mut allocator = match self.config.child_id_start {
            Some(start) => IdAllocator::new(start, prepared.iter().map(|p| p.id.clone()).collect()),
            None => IdAllocator::after(prepared.iter().map(|p| p.id.clone()).collect()),
        };
        let mut out = Output::default();
        let mut handled = vec![false; prepared.len()];

        for (done, p) in handled.iter_mut().zip(&prepared) {
            if !p.collection {
                continue;
            }
            *done = true;
            let mut row = p.product_row();
            (row.member_of_existing_entity_id, row.member_of) = parent_of(p.record);
            row.model = "Collection".into();
            row.resource_type = "Collection".into();
            debug!(row = p.row, id = %p.id, "collection");
            let status = if out.emit(row) {
                EntryStatus::Collection
            } else {
                EntryStatus::Skipped("duplicate id".into())
            };
            self.progress.update_entry(&p.entry(), status);
        }

        for (done, p) in handled.iter_mut().zip(&prepared) {
            if *done {
                continue;
            }
            let siblings = compound::detect(p.record, self.assets);
            let Some((kind, group)) = siblings.group() else {
                continue;
            };
            *done = true;
            let mut parent = p.product_row();
            (parent.member_of_existing_entity_id, parent.member_of) = parent_of(p.record);
            parent.model = "Compound".into();
            parent.resource_type = kind.compound_resource_type().into();
            if !out.emit(parent) {
                self.progress
                    .update_entry(&p.entry(), EntryStatus::Skipped("duplicate id".into()));
                continue;
            }
            for (n, sibling) in group.iter().enumerate() {
                let asset = sibling.asset;
                let mut child = p.product_row();
                child.id = allocator.allocate();
                child.member_of = p.id.clone();
                let label = match kind {
                    MediaKind::Audio => side_label::extract(&asset.file_name, &sibling.prefix),
                    _ => format!("Page {}", n + 1),
                };
                child.title = child_title(&p.fields.title, &label);
                self.attach(&mut child, asset);
                debug!(
                    row = p.row,
                    parent = %p.id,
                    id = %child.id,
                    file = %asset.file_name,
                    "compound child"
                );
                out.emit(child);
            }
            self.progress.update_entry(
                &p.entry(),
                EntryStatus::Compound {
                    children: group.len(),
                },
            );
        }

        for (done, p) in handled.iter().zip(&prepared) {
            if *done {
                continue;
            }
            let mut row = p.product_row();
            (row.member_of_existing_entity_id, row.member_of) = parent_of(p.record);
            let matches = self
                .resolver
                .resolve(p.record.locator(), p.record.shelf_locator());
            let status = match matches.preferred() {
                Some(asset) => {
                    debug!(
                        row = p.row,
                        locator = p.record.locator(),
                        tier = ?matches.tier,
                        file = %asset.file_name,
                        "matched"
                    );
                    self.attach(&mut row, asset);
                    EntryStatus::Matched {
                        file: asset.file_name.clone(),
                    }
                }
                None => {
                    warn!(row = p.row, locator = p.record.locator(), "no matching asset");
                    out.diagnostics.unmatched.push(Unmatched {
                        row: p.row,
                        reference_code: p.record.reference_code.clone(),
                        locator: p.record.locator().to_owned(),
                        title: p.fields.title.clone(),
                    });
                    EntryStatus::Unmatched
                }
            };
            let status = if out.emit(row) {
                status
            } else {
                EntryStatus::Skipped("duplicate id".into())
            };
            self.progress.update_entry(&p.entry(), status);
        }

        Synthesis {
            rows: out.rows,
            diagnostics: out.diagnostics,
        }
    }
}
