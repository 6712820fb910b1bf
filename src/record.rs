//! Row types for the two input tables and the product table.

use serde::Deserialize;

use crate::normalize;

/// One archival description exported from AtoM.
///
/// Every recognized column is a named field; columns missing from the export
/// default to the empty string and unknown columns are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DescriptionRecord {
    #[serde(rename = "legacyId")]
    pub legacy_id: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    #[serde(rename = "levelOfDescription")]
    pub level_of_description: String,
    pub title: String,
    #[serde(rename = "physicalObjectLocation")]
    pub physical_object_location: String,
    /// Secondary shelf locator, consulted when it differs from the location.
    #[serde(rename = "physicalObjectName")]
    pub physical_object_name: String,
    #[serde(rename = "referenceCode")]
    pub reference_code: String,
    #[serde(rename = "eventActors")]
    pub event_actors: String,
    #[serde(rename = "eventTypes")]
    pub event_types: String,
    #[serde(rename = "eventStartDates")]
    pub event_start_dates: String,
    #[serde(rename = "eventEndDates")]
    pub event_end_dates: String,
    #[serde(rename = "radTitleStatementOfResponsibility")]
    pub statement_of_responsibility: String,
    #[serde(rename = "radTitleStatementOfResponsibilityNote")]
    pub statement_of_responsibility_note: String,
    #[serde(rename = "radTitleAttributionsAndConjectures")]
    pub attributions_and_conjectures: String,
    #[serde(rename = "radNoteAccompanyingMaterial")]
    pub note_accompanying_material: String,
    #[serde(rename = "scopeAndContent")]
    pub scope_and_content: String,
    #[serde(rename = "extentAndMedium")]
    pub extent_and_medium: String,
    pub repository: String,
    pub slug: String,
}

impl DescriptionRecord {
    /// Trimmed primary locator.
    pub fn locator(&self) -> &str {
        self.physical_object_location.trim()
    }

    /// Trimmed secondary locator, only when it is present and differs from the primary one.
    pub fn shelf_locator(&self) -> Option<&str> {
        let shelf = self.physical_object_name.trim();
        (!shelf.is_empty() && shelf != self.locator()).then_some(shelf)
    }

    /// `levelOfDescription` values that always denote a leaf.
    pub fn is_leaf_level(&self) -> bool {
        matches!(self.level_of_description.trim(), "" | "File" | "Item")
    }
}

/// Media classification of an asset, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Audio,
    Other,
}

impl MediaKind {
    pub fn of(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else {
            Self::Other
        }
    }

    /// `resource_type` label of a compound parent grouping this kind of media.
    pub fn compound_resource_type(self) -> &'static str {
        match self {
            Self::Audio => "Sound",
            Self::Image => "Image",
            Self::Other => "Other",
        }
    }
}

/// Repository `model` and `resource_type` for a MIME type.
pub fn model_and_resource_type(mime: &str) -> (&'static str, &'static str) {
    if mime.starts_with("audio/") {
        ("Audio", "Sound")
    } else if mime.starts_with("video/") {
        ("Video", "Moving Image")
    } else if mime.starts_with("image/") {
        ("Image", "Image")
    } else if mime == "application/pdf" {
        ("Digital Document", "Text")
    } else {
        ("Other", "Other")
    }
}

/// Raw exiftool row as it appears in `source2.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawAsset {
    #[serde(rename = "SourceFile")]
    pub source_file: String,
    #[serde(rename = "FileName")]
    pub file_name: String,
    #[serde(rename = "MIMEType")]
    pub mime_type: String,
    #[serde(rename = "PageCount")]
    pub page_count: String,
    #[serde(rename = "FileCreateDate")]
    pub file_create_date: String,
    #[serde(rename = "Title")]
    pub title: String,
}

/// One digitized file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Row position in the asset table; stable identity for deduplication.
    pub index: usize,
    pub source_file: String,
    pub file_name: String,
    pub mime_type: String,
    pub page_count: Option<u32>,
    pub create_date: Option<String>,
    pub title: Option<String>,
}

impl AssetRecord {
    pub(crate) fn from_raw(index: usize, raw: RawAsset) -> Self {
        let file_name = if raw.file_name.trim().is_empty() {
            normalize::basename(&raw.source_file).to_owned()
        } else {
            raw.file_name.trim().to_owned()
        };
        let non_empty = |s: String| (!s.trim().is_empty()).then(|| s.trim().to_owned());
        Self {
            index,
            page_count: raw.page_count.trim().parse().ok(),
            source_file: raw.source_file,
            file_name,
            mime_type: raw.mime_type.trim().to_owned(),
            create_date: non_empty(raw.file_create_date),
            title: non_empty(raw.title),
        }
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::of(&self.mime_type)
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        normalize::strip_extension(&self.file_name)
    }
}

/// One row of the archives product table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRow {
    /// 1-based row of the description table this row came from (header is row 1).
    pub source_row: usize,
    pub id: String,
    pub member_of_existing_entity_id: String,
    pub member_of: String,
    pub model: String,
    pub digital_file: String,
    pub mime: String,
    pub title: String,
    pub resource_type: String,
    pub language: String,
    pub local_identifier: String,
    pub agents: String,
    pub description: String,
    pub origin_information: String,
    pub extent: String,
    pub physical_location: String,
    pub shelf_locator: String,
}

impl ProductRow {
    /// Column names; the agent column is named after the configured entity type.
    pub fn header(agent_column: &str) -> [&str; 16] {
        [
            "ID",
            "member_of_existing_entity_id",
            "member_of",
            "model",
            "digital_file",
            "mime",
            "title",
            "resource_type",
            "language",
            "local_identifier",
            agent_column,
            "description",
            "origin_information",
            "extent",
            "physical_location",
            "shelf_locator",
        ]
    }

    /// Cell values in header order.
    pub fn values(&self) -> [&str; 16] {
        [
            &self.id,
            &self.member_of_existing_entity_id,
            &self.member_of,
            &self.model,
            &self.digital_file,
            &self.mime,
            &self.title,
            &self.resource_type,
            &self.language,
            &self.local_identifier,
            &self.agents,
            &self.description,
            &self.origin_information,
            &self.extent,
            &self.physical_location,
            &self.shelf_locator,
        ]
    }
}
