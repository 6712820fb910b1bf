//! Tiered matching of a description locator against the asset table.
//!
//! Tiers run from strictest to loosest and the first tier that matches
//! anything ends the search. Within a tier the first asset of each media kind
//! wins, in asset-table order.

use std::sync::LazyLock;

use tracing::trace;

use crate::{
    normalize,
    record::{AssetRecord, MediaKind},
    table::AssetTable,
};

static STRUCTURED_LOCATOR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^(SR|MI)\s*(\d+)\.(\d+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// `SR12.34` shelf codes compared on their dot-normalized prefix.
    Structured,
    /// Compact forms identical.
    Exact,
    /// One side is a prefix of the other.
    Prefix,
    /// One side contains the other.
    Substring,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Structured => "structured",
            Self::Exact => "exact",
            Self::Prefix => "prefix",
            Self::Substring => "substring",
        })
    }
}

/// Best assets found for one record, at most one per media kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct Matches<'a> {
    pub image: Option<&'a AssetRecord>,
    pub audio: Option<&'a AssetRecord>,
    /// Anything that is neither image nor audio (PDF, video, ...).
    pub other: Option<&'a AssetRecord>,
    pub tier: Option<Tier>,
}

impl<'a> Matches<'a> {
    /// Audio wins over image, image over anything else.
    pub fn preferred(&self) -> Option<&'a AssetRecord> {
        self.audio.or(self.image).or(self.other)
    }

    pub fn is_empty(&self) -> bool {
        self.preferred().is_none()
    }

    fn offer(&mut self, asset: &'a AssetRecord) {
        let slot = match asset.kind() {
            MediaKind::Image => &mut self.image,
            MediaKind::Audio => &mut self.audio,
            MediaKind::Other => &mut self.other,
        };
        slot.get_or_insert(asset);
    }

    fn image_and_audio_filled(&self) -> bool {
        self.image.is_some() && self.audio.is_some()
    }
}

/// Comparison forms of one locator, computed once per record.
struct LocatorForms {
    loose: String,
    compact: String,
}

impl LocatorForms {
    fn new(locator: &str) -> Option<Self> {
        let forms = Self {
            loose: normalize::loose(locator),
            compact: normalize::compact(locator),
        };
        (!forms.compact.is_empty()).then_some(forms)
    }
}

/// Comparison forms of one asset's file name, extension stripped.
struct AssetForms {
    loose: String,
    compact: String,
}

impl AssetForms {
    fn new(asset: &AssetRecord) -> Self {
        let stem = normalize::dot_for_underscore(asset.stem());
        Self {
            loose: normalize::loose(&stem),
            compact: normalize::compact(&stem),
        }
    }
}

fn either_prefix(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.starts_with(b) || b.starts_with(a))
}

fn either_contains(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// `SR 12.34` -> `sr12.34`, when the locator follows the two-part shelf scheme.
fn structured_prefix(locator: &str) -> Option<String> {
    let captures = STRUCTURED_LOCATOR.captures(locator)?;
    Some(format!("{}{}.{}", &captures[1], &captures[2], &captures[3]).to_lowercase())
}

/// Dot-normalized, extension-stripped name starts with `prefix` and the
/// second numeric group ends there.
fn structured_match(prefix: &str, asset: &AssetRecord) -> bool {
    let dotted = normalize::dot_for_underscore(&asset.file_name);
    let base = normalize::strip_extension(&dotted).to_lowercase();
    base.strip_prefix(prefix)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
}

pub struct Resolver<'a> {
    assets: &'a AssetTable,
    forms: Vec<AssetForms>,
}

impl<'a> Resolver<'a> {
    pub fn new(assets: &'a AssetTable) -> Self {
        let forms = assets.iter().map(AssetForms::new).collect();
        Self { assets, forms }
    }

    /// Run one tier over the whole table, stopping early once both image and audio are found.
    fn scan(&self, tier: Tier, accept: impl Fn(&AssetRecord, &AssetForms) -> bool) -> Matches<'a> {
        let mut matches = Matches::default();
        for (asset, forms) in self.assets.iter().zip(&self.forms) {
            if accept(asset, forms) {
                trace!(%tier, file = %asset.file_name, "tier candidate");
                matches.offer(asset);
                if matches.image_and_audio_filled() {
                    break;
                }
            }
        }
        if !matches.is_empty() {
            matches.tier = Some(tier);
        }
        matches
    }

    /// Match a record's locator, and its secondary shelf locator when given.
    pub fn resolve(&self, locator: &str, shelf_locator: Option<&str>) -> Matches<'a> {
        let locators = std::iter::once(locator)
            .chain(shelf_locator)
            .map(str::trim)
            .filter(|locator| !locator.is_empty())
            .collect::<Vec<_>>();

        let structured = locators
            .iter()
            .filter_map(|locator| structured_prefix(locator))
            .collect::<Vec<_>>();
        if !structured.is_empty() {
            let found = self.scan(Tier::Structured, |asset, _| {
                structured.iter().any(|prefix| structured_match(prefix, asset))
            });
            if !found.is_empty() {
                return found;
            }
        }

        let forms = locators
            .iter()
            .filter_map(|locator| LocatorForms::new(locator))
            .collect::<Vec<_>>();
        if forms.is_empty() {
            return Matches::default();
        }

        let tiers: [(Tier, fn(&LocatorForms, &AssetForms) -> bool); 3] = [
            (Tier::Exact, |l, a| l.compact == a.compact),
            (Tier::Prefix, |l, a| {
                either_prefix(&l.loose, &a.loose) || either_prefix(&l.compact, &a.compact)
            }),
            (Tier::Substring, |l, a| {
                either_contains(&l.loose, &a.loose) || either_contains(&l.compact, &a.compact)
            }),
        ];
        for (tier, accept) in tiers {
            let found = self.scan(tier, |_, asset| forms.iter().any(|l| accept(l, asset)));
            if !found.is_empty() {
                return found;
            }
        }
        Matches::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::asset;

    fn table(files: &[(&str, &str)]) -> AssetTable {
        files.iter().map(|(name, mime)| asset(name, mime)).collect()
    }

    #[test]
    fn exact_compact_equality_wins_before_looser_tiers() {
        let assets = table(&[
            ("MI5-1-extra.tif", "image/tiff"),
            ("MI-5.tif", "image/tiff"),
        ]);
        let resolver = Resolver::new(&assets);
        let found = resolver.resolve("MI 5", None);
        assert_eq!(found.tier, Some(Tier::Exact));
        assert_eq!(found.image.unwrap().file_name, "MI-5.tif");
    }

    #[test]
    fn structured_locator_uses_dot_underscore_equivalence() {
        let assets = table(&[
            ("SR123.4-x.tif", "image/tiff"),
            ("SR12_34-detail.tif", "image/tiff"),
        ]);
        let resolver = Resolver::new(&assets);
        let found = resolver.resolve("SR 12.34", None);
        assert_eq!(found.tier, Some(Tier::Structured));
        assert_eq!(found.image.unwrap().file_name, "SR12_34-detail.tif");
    }

    #[test]
    fn structured_locator_respects_numeric_boundary() {
        let assets = table(&[("SR123.4-x.tif", "image/tiff"), ("SR12.345.tif", "image/tiff")]);
        let resolver = Resolver::new(&assets);
        let found = resolver.resolve("SR 12.34", None);
        assert_ne!(found.tier, Some(Tier::Structured));
    }

    #[test]
    fn prefix_tier_handles_trailing_disambiguator() {
        let assets = table(&[("V1999-page2.tif", "image/tiff")]);
        let resolver = Resolver::new(&assets);
        let found = resolver.resolve("V1999", None);
        assert_eq!(found.tier, Some(Tier::Prefix));
        assert!(found.image.is_some());
    }

    #[test]
    fn substring_tier_is_last_resort() {
        let assets = table(&[("scan_of_box12_item.tif", "image/tiff")]);
        let resolver = Resolver::new(&assets);
        let found = resolver.resolve("box12", None);
        assert_eq!(found.tier, Some(Tier::Substring));
    }

    #[test]
    fn one_match_per_media_kind_in_table_order() {
        let assets = table(&[
            ("T7.tif", "image/tiff"),
            ("t-7.jpg", "image/jpeg"),
            ("T7.mp3", "audio/mpeg"),
            ("T7.pdf", "application/pdf"),
        ]);
        let resolver = Resolver::new(&assets);
        let found = resolver.resolve("T7", None);
        assert_eq!(found.tier, Some(Tier::Exact));
        assert_eq!(found.image.unwrap().file_name, "T7.tif");
        assert_eq!(found.audio.unwrap().file_name, "T7.mp3");
        assert_eq!(found.preferred().unwrap().file_name, "T7.mp3");
    }

    #[test]
    fn shelf_locator_is_consulted() {
        let assets = table(&[("Box3.pdf", "application/pdf")]);
        let resolver = Resolver::new(&assets);
        let found = resolver.resolve("Shelf A", Some("Box 3"));
        assert_eq!(found.tier, Some(Tier::Exact));
        assert_eq!(found.other.unwrap().file_name, "Box3.pdf");
    }

    #[test]
    fn empty_locator_never_matches() {
        let assets = table(&[("anything.tif", "image/tiff")]);
        let resolver = Resolver::new(&assets);
        assert!(resolver.resolve("  ", None).is_empty());
        assert!(resolver.resolve("-.", None).is_empty());
    }
}
