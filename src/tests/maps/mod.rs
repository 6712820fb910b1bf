use crate::{
    ErrorDetail,
    maps::{MAPPING_REPORT, MapsRun, run_maps},
    progress::NullReporter,
    reconcile::MISSING_METADATA_REPORT,
};

const FIXTURES: &str = "src/tests/maps";

#[test]
fn catalog_cards_expand_per_photo() {
    let dir = super::stage(FIXTURES, &["source1.csv", "source2.csv"]);
    let config = super::load_config("src/tests/maps/config.yaml");
    let run = MapsRun {
        folder: dir.path().to_owned(),
        output: "air_photos".into(),
        scan: None,
    };
    let summary = run_maps(&config, &run, &NullReporter).unwrap();
    assert_eq!(summary.product, dir.path().join("air_photos.csv"));
    assert_eq!(summary.rows, 6);
    assert_eq!(summary.problems, 1);
    assert_eq!(summary.unused_assets, 1);

    let rows = super::read_rows(&summary.product);
    let ids = rows.iter().map(|row| row["ID"].as_str()).collect::<Vec<_>>();
    assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
    let files = rows
        .iter()
        .map(|row| row["digital_file"].as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        files,
        [
            "repo-ingest://maps/A17_003.tif",
            "repo-ingest://maps/A17_005.tif",
            "repo-ingest://maps/A17_006.tif",
            "repo-ingest://maps/B2_007.tif",
            "repo-ingest://maps/B2_005.tif",
            "repo-ingest://maps/scan_r3.jpg",
        ]
    );
    assert_eq!(
        rows[0]["title"],
        "Kingston, Ontario (Flight Line A 17, Photo Number 3)"
    );
    assert_eq!(rows[0]["shelf_locator"], "Flight Line A 17, Photo Number 3");
    assert_eq!(rows[0]["local_item_identifier"], "R1");
    assert_eq!(rows[0]["local_identifier"], "31C/8");
    assert_eq!(rows[0]["description"], "May 1962. North up.");
    assert_eq!(rows[0]["notes"], "scale|1:15840");
    assert_eq!(
        rows[0]["hierarchical_geographic_subject"],
        "North America|Canada||Ontario"
    );
    assert_eq!(rows[0]["member_of_existing_entity_id"], "10678");
    assert_eq!(
        rows[0]["physical_location"],
        "Queen's University Maps and Air Photos Collection"
    );
    assert_eq!(
        rows[3]["title"],
        "Wolfe Island (Flight Line B2, Roll [4], Photo Number 7)"
    );
    assert_eq!(rows[3]["description"], "Harbour");
    assert_eq!(rows[4]["mime"], "");
    assert_eq!(rows[5]["title"], "");
    assert_eq!(rows[5]["mime"], "image/jpeg");
    assert_eq!(rows[5]["origin_information"], "1980");

    let mapping = std::fs::read_to_string(dir.path().join(MAPPING_REPORT)).unwrap();
    assert_eq!(
        mapping,
        "Mapping issues encountered during processing:\nCould not find MIMEType for B2_005.tif\n"
    );
    let missing = std::fs::read_to_string(dir.path().join(MISSING_METADATA_REPORT)).unwrap();
    assert!(missing.ends_with(":\n./unused.tif\n"));
}

#[test]
fn no_mapping_report_when_every_lookup_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("source1.csv"),
        "Record_ID,LOCATION,FLIGHT_LINE,PHOTO_NUMBERS\nR9,Napanee,C3,1\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("source2.csv"),
        "SourceFile,FileName,MIMEType\n./C3_001.tif,C3_001.tif,image/tiff\n",
    )
    .unwrap();
    let run = MapsRun {
        folder: dir.path().to_owned(),
        output: String::new(),
        scan: None,
    };
    let summary = run_maps(&Default::default(), &run, &NullReporter).unwrap();
    assert_eq!(summary.product, dir.path().join("product.csv"));
    assert_eq!(summary.problems, 0);
    assert!(!dir.path().join(MAPPING_REPORT).exists());
    let missing = std::fs::read_to_string(dir.path().join(MISSING_METADATA_REPORT)).unwrap();
    assert!(missing.starts_with("All SourceFile entries"));
}

#[test]
fn missing_asset_table_without_scan_folder_is_fatal() {
    let dir = super::stage(FIXTURES, &["source1.csv"]);
    let run = MapsRun {
        folder: dir.path().to_owned(),
        output: "product".into(),
        scan: None,
    };
    let err = run_maps(&Default::default(), &run, &NullReporter).unwrap_err();
    assert!(matches!(*err.detail, ErrorDetail::MissingTable("source2.csv")));
}
