use std::{io::Write, path::Path};

use crate::{
    ErrorDetail,
    operator::ScriptedOperator,
    progress::NullReporter,
    reconcile::{ArchivesRun, AssetSource, ERROR_REPORT, MISSING_METADATA_REPORT, run_archives},
    table::archive,
};

const FIXTURES: &str = "src/tests/archives";

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

fn bundle_descriptions(dir: &Path) {
    let descriptions = std::fs::read(Path::new(FIXTURES).join("source1.csv")).unwrap();
    write_zip(
        &dir.join("atom_export.zip"),
        &[
            ("export/README.txt", &b"AtoM CSV export"[..]),
            ("export/information_objects.csv", descriptions.as_slice()),
        ],
    );
}

#[test]
fn export_bundle_to_product_table() {
    let dir = super::stage(FIXTURES, &["source2.csv"]);
    bundle_descriptions(dir.path());
    let config = super::load_config("src/tests/archives/config.yaml");
    let run = ArchivesRun {
        dest: dir.path().to_owned(),
        descriptions: None,
        assets: AssetSource::Table(dir.path().join("source2.csv")),
    };
    let operator = ScriptedOperator::new(&config);
    let summary = run_archives(&config, &run, &operator, &NullReporter).unwrap();
    assert_eq!(summary.rows, 9);
    assert_eq!(summary.problems, 1);
    assert_eq!(summary.unused_assets, 1);
    assert!(dir.path().join("source1.csv").is_file());

    let rows = super::read_rows(&summary.product);
    let column = |name: &str| {
        rows.iter()
            .map(|row| row[name].as_str())
            .collect::<Vec<_>>()
    };
    assert_eq!(
        column("ID"),
        ["100", "101", "105", "106", "102", "107", "108", "103", "104"]
    );
    assert_eq!(
        column("model"),
        [
            "Collection",
            "Compound",
            "Audio",
            "Audio",
            "Compound",
            "Image",
            "Image",
            "Digital Document",
            ""
        ]
    );
    assert_eq!(
        column("member_of"),
        ["", "100", "101", "101", "100", "102", "102", "100", ""]
    );
    assert_eq!(
        column("member_of_existing_entity_id"),
        ["900", "", "", "", "", "", "", "", "900"]
    );
    assert_eq!(rows[1]["resource_type"], "Sound");
    assert_eq!(rows[4]["resource_type"], "Image");
    assert_eq!(rows[2]["title"], "Reminiscences - SR1267.435 - SideA");
    assert_eq!(rows[3]["title"], "Reminiscences - SR1267.435 - SideB");
    assert_eq!(
        rows[3]["digital_file"],
        "repo-ingest://archives/SR1267_435-PhilBrown-SideB.mp3"
    );
    assert_eq!(rows[6]["title"], "Campus sketches - MI5 - Page 2");
    assert_eq!(rows[7]["mime"], "application/pdf");
    assert_eq!(rows[7]["resource_type"], "Text");

    assert_eq!(rows[0]["organizations"], "Queen's University Archives");
    assert_eq!(rows[1]["organizations"], "Brown, Phil|relators:ivr");
    assert_eq!(rows[7]["organizations"], "CFRC|relators:cre,col");
    assert_eq!(rows[0]["origin_information"], "1922/1990");
    assert_eq!(rows[1]["origin_information"], "1975");
    assert_eq!(rows[1]["extent"], "1 audio reel, 2 sides");
    assert_eq!(rows[8]["digital_file"], "");
    assert_eq!(rows[8]["shelf_locator"], "SR77");

    let errors = std::fs::read_to_string(dir.path().join(ERROR_REPORT)).unwrap();
    assert_eq!(
        errors,
        "Rows from source1.csv that could not be matched to source2.csv:\n\
         Row 6: referenceCode=F1-4, physicalObjectLocation=SR77, title=Lost tape - SR77\n\
         \nRows in product.csv with blank fields:\n"
    );
    let missing = std::fs::read_to_string(dir.path().join(MISSING_METADATA_REPORT)).unwrap();
    assert!(missing.ends_with(":\n./images/stray.jpg\n"));
}

#[test]
fn repeated_runs_write_identical_tables() {
    let dir = super::stage(FIXTURES, &["source1.csv", "source2.csv"]);
    let config = super::load_config("src/tests/archives/config.yaml");
    let run = ArchivesRun {
        dest: dir.path().to_owned(),
        descriptions: Some(dir.path().join("source1.csv")),
        assets: AssetSource::Table(dir.path().join("source2.csv")),
    };
    let operator = ScriptedOperator::new(&config);
    let first = run_archives(&config, &run, &operator, &NullReporter).unwrap();
    let first = std::fs::read(&first.product).unwrap();
    let second = run_archives(&config, &run, &operator, &NullReporter).unwrap();
    assert_eq!(first, std::fs::read(&second.product).unwrap());
}

#[test]
fn rows_without_any_parent_are_reported_blank() {
    let dir = super::stage(FIXTURES, &["source1.csv", "source2.csv"]);
    let mut config = super::load_config("src/tests/archives/config.yaml");
    config.default_parent_id.clear();
    let run = ArchivesRun {
        dest: dir.path().to_owned(),
        descriptions: Some(dir.path().join("source1.csv")),
        assets: AssetSource::Table(dir.path().join("source2.csv")),
    };
    let operator = ScriptedOperator::new(&config);
    run_archives(&config, &run, &operator, &NullReporter).unwrap();
    let errors = std::fs::read_to_string(dir.path().join(ERROR_REPORT)).unwrap();
    let (_, blanks) = errors.split_once("blank fields:\n").unwrap();
    let reported = blanks
        .lines()
        .filter(|line| line.starts_with("Row "))
        .collect::<Vec<_>>();
    assert_eq!(
        reported,
        [
            "Row 2 is missing fields: member_of_existing_entity_id, member_of, digital_file, mime, shelf_locator",
            "Row 6 is missing fields: member_of_existing_entity_id, member_of, model, digital_file, mime, resource_type",
        ]
    );
}

#[test]
fn uppercase_extension_is_found() {
    let dir = tempfile::tempdir().unwrap();
    write_zip(
        &dir.path().join("EXPORT.ZIP"),
        &[("descriptions.csv", &b"legacyId,title\n1,Only\n"[..])],
    );
    let table = archive::extract_description_table(dir.path()).unwrap();
    assert_eq!(table, dir.path().join(archive::DESCRIPTION_TABLE));
    assert_eq!(
        std::fs::read_to_string(table).unwrap(),
        "legacyId,title\n1,Only\n"
    );
}

#[test]
fn missing_bundle_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = archive::extract_description_table(dir.path()).unwrap_err();
    assert!(matches!(*err.detail, ErrorDetail::NoArchive));

    write_zip(&dir.path().join("export.zip"), &[("notes.txt", &b"nothing here"[..])]);
    let err = archive::extract_description_table(dir.path()).unwrap_err();
    assert!(matches!(*err.detail, ErrorDetail::NoDescriptionTable));
}
