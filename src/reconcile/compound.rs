//! Detection of description records realized as several digitized files.

use tracing::debug;

use crate::{
    normalize,
    record::{AssetRecord, DescriptionRecord, MediaKind},
    table::AssetTable,
};

/// One sibling file and the normalized locator prefix it extends.
#[derive(Debug, Clone)]
pub struct Sibling<'a> {
    pub asset: &'a AssetRecord,
    pub prefix: String,
}

/// Sibling files of one record, partitioned by media kind, in table order.
#[derive(Debug, Default)]
pub struct Siblings<'a> {
    pub image: Vec<Sibling<'a>>,
    pub audio: Vec<Sibling<'a>>,
}

impl<'a> Siblings<'a> {
    pub fn is_compound(&self) -> bool {
        !self.image.is_empty() || !self.audio.is_empty()
    }

    /// The group emitted for this record: audio when present, otherwise image.
    pub fn group(&self) -> Option<(MediaKind, &[Sibling<'a>])> {
        if !self.audio.is_empty() {
            Some((MediaKind::Audio, self.audio.as_slice()))
        } else if !self.image.is_empty() {
            Some((MediaKind::Image, self.image.as_slice()))
        } else {
            None
        }
    }
}

/// `file_name` begins with `prefix` immediately followed by `-` or `_`.
///
/// Both sides are compared lower-cased with digit-separating periods turned
/// into underscores.
pub fn is_sibling(prefix: &str, file_name: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    let name = normalize::underscore_for_dot(file_name).to_lowercase();
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(['-', '_']))
}

/// Collect every asset that is a delimited extension of the record's locator
/// or shelf locator.
pub fn detect<'a>(record: &DescriptionRecord, assets: &'a AssetTable) -> Siblings<'a> {
    let prefixes = std::iter::once(record.locator())
        .chain(record.shelf_locator())
        .map(normalize::sibling_prefix)
        .filter(|prefix| !prefix.is_empty())
        .collect::<Vec<_>>();

    let mut siblings = Siblings::default();
    for asset in assets.iter() {
        let Some(prefix) = prefixes
            .iter()
            .find(|prefix| is_sibling(prefix, &asset.file_name))
        else {
            continue;
        };
        let group = match asset.kind() {
            MediaKind::Image => &mut siblings.image,
            MediaKind::Audio => &mut siblings.audio,
            MediaKind::Other => continue,
        };
        group.push(Sibling {
            asset,
            prefix: prefix.clone(),
        });
    }
    if siblings.is_compound() {
        debug!(
            locator = record.locator(),
            images = siblings.image.len(),
            audio = siblings.audio.len(),
            "compound object"
        );
    }
    siblings
}
