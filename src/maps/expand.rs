//! One product row per photo on a catalog card.

use tracing::{debug, warn};

use super::{catalog::CatalogCard, photo_numbers};
use crate::{report::Diagnostics, table::AssetTable};

/// One row of the map product table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapRow {
    pub id: String,
    pub local_item_identifier: String,
    pub local_identifier: String,
    pub title: String,
    pub physical_location: String,
    pub hierarchical_geographic_subject: String,
    pub persons: String,
    pub origin_information: String,
    pub notes: String,
    pub description: String,
    pub shelf_locator: String,
    pub resource_type: String,
    pub member_of_existing_entity_id: String,
    pub model: String,
    pub digital_file: String,
    pub mime: String,
}

impl MapRow {
    pub const HEADER: [&str; 16] = [
        "ID",
        "local_item_identifier",
        "local_identifier",
        "title",
        "physical_location",
        "hierarchical_geographic_subject",
        "persons",
        "origin_information",
        "notes",
        "description",
        "shelf_locator",
        "resource_type",
        "member_of_existing_entity_id",
        "model",
        "digital_file",
        "mime",
    ];

    pub fn values(&self) -> [&str; 16] {
        [
            &self.id,
            &self.local_item_identifier,
            &self.local_identifier,
            &self.title,
            &self.physical_location,
            &self.hierarchical_geographic_subject,
            &self.persons,
            &self.origin_information,
            &self.notes,
            &self.description,
            &self.shelf_locator,
            &self.resource_type,
            &self.member_of_existing_entity_id,
            &self.model,
            &self.digital_file,
            &self.mime,
        ]
    }
}

/// Title and shelf locator from whichever of location, flight line, roll and
/// photo number are present.
pub fn title_and_shelf_locator(card: &CatalogCard, photo: &str) -> (String, String) {
    let location = card.location.as_str();
    let line = card.flight_line.as_str();
    let roll = card.roll.as_str();
    match (location.is_empty(), line.is_empty(), photo.is_empty()) {
        (false, false, false) => {
            let shelf = if roll.is_empty() {
                format!("Flight Line {line}, Photo Number {photo}")
            } else {
                format!("Flight Line {line}, Roll [{roll}], Photo Number {photo}")
            };
            (format!("{location} ({shelf})"), shelf)
        }
        (false, _, _) => (location.to_owned(), line.to_owned()),
        (true, false, false) => {
            let both = format!("Flight Line {line}, Photo Number {photo}");
            (both.clone(), both)
        }
        (true, false, true) => {
            let line = format!("Flight Line {line}");
            (line.clone(), line)
        }
        (true, true, false) => {
            let photo = format!("Photo Number {photo}");
            (photo.clone(), photo)
        }
        (true, true, true) => Default::default(),
    }
}

/// `DATE. ORIENTATION. NOTES.` from the pieces present, else `SHOWN`, else `LOCATION`.
pub fn description(card: &CatalogCard) -> String {
    let pieces = [&card.date, &card.orientation, &card.notes]
        .into_iter()
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>();
    if !pieces.is_empty() {
        format!("{}.", pieces.join(". "))
    } else if !card.shown.is_empty() {
        card.shown.clone()
    } else {
        card.location.clone()
    }
}

/// `<flightline>_<padded photo>.tif`, or the card's image link.
pub fn file_name(card: &CatalogCard, photo: &str) -> String {
    let line = card.flight_line.replace(' ', "");
    let photo = photo_numbers::pad(photo);
    if !line.is_empty() && !photo.is_empty() {
        format!("{line}_{photo}.tif")
    } else {
        card.image_link.clone()
    }
}

pub struct Expander<'a> {
    pub assets: &'a AssetTable,
    pub uri_prefix: &'a str,
    pub physical_location: &'a str,
    pub parent_id: &'a str,
}

impl Expander<'_> {
    fn mime(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        self.assets
            .get(key)
            .map(|asset| asset.mime_type.as_str())
            .filter(|mime| !mime.is_empty())
    }

    /// Rows for every card, with ids counting up from 1.
    pub fn expand(&self, cards: &[CatalogCard], diagnostics: &mut Diagnostics) -> Vec<MapRow> {
        let mut rows = Vec::new();
        for card in cards {
            let mut photos = photo_numbers::parse(&card.photo_numbers);
            if photos.is_empty() {
                photos.push(String::new());
            }
            for photo in &photos {
                let (title, shelf_locator) = title_and_shelf_locator(card, photo);
                let file = file_name(card, photo);
                let mime = match self.mime(&file).or_else(|| self.mime(&card.image_link)) {
                    Some(mime) => mime.to_owned(),
                    None => {
                        let missing = if file.is_empty() { &card.image_link } else { &file };
                        warn!(record = %card.record_id, file = %missing, "no MIME type found");
                        diagnostics
                            .mapping_problems
                            .push(format!("Could not find MIMEType for {missing}"));
                        String::new()
                    }
                };
                let row = MapRow {
                    id: (rows.len() + 1).to_string(),
                    local_item_identifier: card.record_id.clone(),
                    local_identifier: card.nts_map_no.clone(),
                    title,
                    physical_location: self.physical_location.to_owned(),
                    hierarchical_geographic_subject: if card.province.is_empty() {
                        String::new()
                    } else {
                        format!("North America|Canada||{}", card.province)
                    },
                    persons: String::new(),
                    origin_information: card.year.clone(),
                    notes: if card.scale.is_empty() {
                        String::new()
                    } else {
                        format!("scale|{}", card.scale)
                    },
                    description: description(card),
                    shelf_locator,
                    resource_type: "Image".into(),
                    member_of_existing_entity_id: self.parent_id.to_owned(),
                    model: "Image".into(),
                    digital_file: if file.is_empty() {
                        String::new()
                    } else {
                        format!("{}{file}", self.uri_prefix)
                    },
                    mime,
                };
                debug!(id = %row.id, record = %card.record_id, file = %file, "map row");
                rows.push(row);
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::asset;

    fn card() -> CatalogCard {
        CatalogCard {
            record_id: "R1".into(),
            nts_map_no: "31C".into(),
            location: "Kingston".into(),
            province: "Ontario".into(),
            year: "1962".into(),
            scale: "1:15840".into(),
            flight_line: "A 17".into(),
            photo_numbers: "3,5-6".into(),
            ..Default::default()
        }
    }

    #[test]
    fn titles_from_present_parts() {
        let mut card = card();
        assert_eq!(
            title_and_shelf_locator(&card, "3"),
            (
                "Kingston (Flight Line A 17, Photo Number 3)".to_owned(),
                "Flight Line A 17, Photo Number 3".to_owned()
            )
        );
        card.roll = "2".into();
        assert_eq!(
            title_and_shelf_locator(&card, "3").1,
            "Flight Line A 17, Roll [2], Photo Number 3"
        );
        assert_eq!(
            title_and_shelf_locator(&card, ""),
            ("Kingston".to_owned(), "A 17".to_owned())
        );
        card.location.clear();
        assert_eq!(title_and_shelf_locator(&card, "").0, "Flight Line A 17");
        card.flight_line.clear();
        assert_eq!(title_and_shelf_locator(&card, "9").1, "Photo Number 9");
        assert_eq!(
            title_and_shelf_locator(&card, ""),
            (String::new(), String::new())
        );
    }

    #[test]
    fn description_fallbacks() {
        let mut card = card();
        assert_eq!(description(&card), "Kingston");
        card.shown = "Harbour".into();
        assert_eq!(description(&card), "Harbour");
        card.date = "May 1962".into();
        card.notes = "cloud cover ".into();
        assert_eq!(description(&card), "May 1962. cloud cover.");
    }

    #[test]
    fn one_row_per_photo() {
        let assets = [asset("A17_003.tif", "image/tiff"), asset("A17_005.tif", "image/tiff")]
            .into_iter()
            .collect::<AssetTable>();
        let expander = Expander {
            assets: &assets,
            uri_prefix: "repo-ingest://maps/",
            physical_location: "Maps",
            parent_id: "10678",
        };
        let mut diagnostics = Diagnostics::default();
        let rows = expander.expand(&[card()], &mut diagnostics);
        assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), ["1", "2", "3"]);
        assert_eq!(rows[0].digital_file, "repo-ingest://maps/A17_003.tif");
        assert_eq!(rows[0].mime, "image/tiff");
        assert_eq!(rows[0].hierarchical_geographic_subject, "North America|Canada||Ontario");
        assert_eq!(rows[0].notes, "scale|1:15840");
        assert_eq!(rows[0].origin_information, "1962");
        assert_eq!(rows[2].mime, "");
        assert_eq!(
            diagnostics.mapping_problems,
            ["Could not find MIMEType for A17_006.tif"]
        );
    }

    #[test]
    fn image_link_is_the_fallback_file() {
        let assets = [asset("scan.jpg", "image/jpeg")].into_iter().collect::<AssetTable>();
        let expander = Expander {
            assets: &assets,
            uri_prefix: "repo-ingest://maps/",
            physical_location: "Maps",
            parent_id: "",
        };
        let card = CatalogCard {
            location: "Elsewhere".into(),
            image_link: "scan.jpg".into(),
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::default();
        let rows = expander.expand(&[card], &mut diagnostics);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].digital_file, "repo-ingest://maps/scan.jpg");
        assert_eq!(rows[0].mime, "image/jpeg");
        assert!(diagnostics.mapping_problems.is_empty());
    }
}
