//! Air-photo catalog cards: header and cell cleanup, then typed access.

use std::{collections::HashMap, path::Path, sync::LazyLock};

use indexmap::IndexMap;

use crate::table::RawTable;

static COMMA_SPACING: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r",\s+").unwrap());

/// Header names cut at the first whitespace, `Record_ID` variants unified and
/// later duplicates renamed `<NAME>_DUPLICATE<n>`.
pub fn clean_header(header: &[String]) -> Vec<String> {
    let mut seen = HashMap::<String, usize>::new();
    header
        .iter()
        .map(|name| {
            if name.contains("Record_ID") {
                return "Record_ID".to_owned();
            }
            let base = name.split_whitespace().next().unwrap_or_default().to_owned();
            match seen.get_mut(&base) {
                Some(count) => {
                    let renamed = format!("{base}_DUPLICATE{count}");
                    *count += 1;
                    renamed
                }
                None => {
                    seen.insert(base.clone(), 1);
                    base
                }
            }
        })
        .collect()
}

/// Left-trimmed, with every `,` followed by whitespace normalized to `, `.
pub fn clean_value(value: &str) -> String {
    COMMA_SPACING
        .replace_all(value.trim_start(), ", ")
        .into_owned()
}

/// One catalog card. Absent columns read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogCard {
    pub record_id: String,
    pub nts_map_no: String,
    pub location: String,
    pub province: String,
    pub year: String,
    pub scale: String,
    pub notes: String,
    pub shown: String,
    pub flight_line: String,
    pub roll: String,
    pub date: String,
    pub orientation: String,
    pub photo_numbers: String,
    /// `IMAGE_LINK`, or `IMAGE` when that is empty.
    pub image_link: String,
}

impl CatalogCard {
    fn from_cells(cells: &IndexMap<&str, &str>) -> Self {
        let get = |name: &str| cells.get(name).copied().unwrap_or_default().to_owned();
        let image_link = match get("IMAGE_LINK") {
            link if link.is_empty() => get("IMAGE"),
            link => link,
        };
        Self {
            record_id: get("Record_ID"),
            nts_map_no: get("NTS_MAP_NO"),
            location: get("LOCATION"),
            province: get("PROVINCE"),
            year: get("YEAR"),
            scale: get("SCALE"),
            notes: get("NOTES"),
            shown: get("SHOWN"),
            flight_line: get("FLIGHT_LINE"),
            roll: get("ROLL"),
            date: get("DATE"),
            orientation: get("ORIENTATION"),
            photo_numbers: get("PHOTO_NUMBERS"),
            image_link,
        }
    }
}

/// Clean a raw catalog table in place.
pub fn clean(table: RawTable) -> RawTable {
    RawTable {
        header: clean_header(&table.header),
        rows: table
            .rows
            .iter()
            .map(|row| row.iter().map(|value| clean_value(value)).collect())
            .collect(),
    }
}

pub fn read_cards(path: &Path) -> Result<Vec<CatalogCard>, crate::Error> {
    let table = clean(RawTable::read(path)?);
    Ok(table
        .keyed_rows()
        .map(|cells| CatalogCard::from_cells(&cells))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_cleanup() {
        let header = [
            "\u{feff}Record_ID",
            "FLIGHT_LINE (old)",
            "PHOTO_NUMBERS",
            "FLIGHT_LINE",
            "FLIGHT_LINE",
        ]
        .map(String::from);
        assert_eq!(
            clean_header(&header),
            [
                "Record_ID",
                "FLIGHT_LINE",
                "PHOTO_NUMBERS",
                "FLIGHT_LINE_DUPLICATE1",
                "FLIGHT_LINE_DUPLICATE2"
            ]
        );
    }

    #[test]
    fn value_cleanup() {
        assert_eq!(clean_value("   Kingston,   Ontario "), "Kingston, Ontario ");
        assert_eq!(clean_value("   "), "");
        assert_eq!(clean_value("a,b"), "a,b");
    }

    #[test]
    fn image_falls_back_when_link_empty() {
        let cells = IndexMap::from([("IMAGE_LINK", ""), ("IMAGE", "scan.tif"), ("ROLL", "4")]);
        let card = CatalogCard::from_cells(&cells);
        assert_eq!(card.image_link, "scan.tif");
        assert_eq!(card.roll, "4");
        assert_eq!(card.location, "");
    }

    #[test]
    fn reads_and_cleans_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source1.csv");
        std::fs::write(
            &path,
            "Record_ID (auto),LOCATION,FLIGHT_LINE,PHOTO_NUMBERS\n17,  Kingston,A 123,\"3,  5-6\"\n",
        )
        .unwrap();
        let cards = read_cards(&path).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].record_id, "17");
        assert_eq!(cards[0].location, "Kingston");
        assert_eq!(cards[0].photo_numbers, "3, 5-6");
    }
}
