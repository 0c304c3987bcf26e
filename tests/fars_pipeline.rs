//! End-to-end checks over bzip2-compressed accident files written to a temp directory.

use bzip2::write::BzEncoder;
use bzip2::Compression;
use fars::{
    fars_read, make_filename, Fars, FarsConfig, FarsError, MapOptions, MapOutcome, YearLoad,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "ST_CASE,STATE,MONTH,DAY,LATITUDE,LONGITUD,FATALS";

/// (state, month, latitude, longitude)
type Row = (i64, u32, f64, f64);

fn write_year(dir: &Path, year: i64, rows: &[Row]) {
    let mut csv = format!("{}\n", HEADER);
    for (i, (state, month, lat, lon)) in rows.iter().enumerate() {
        csv.push_str(&format!("{},{},{},1,{},{},1\n", 10000 + i, state, month, lat, lon));
    }
    let file = File::create(dir.join(make_filename(year))).unwrap();
    let mut encoder = BzEncoder::new(file, Compression::default());
    encoder.write_all(csv.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn fixture() -> (TempDir, Fars) {
    let dir = tempfile::tempdir().unwrap();
    write_year(
        dir.path(),
        2013,
        &[
            (1, 1, 33.5, -86.8),
            (1, 1, 34.2, -87.1),
            (1, 2, 32.9, -85.6),
            (6, 1, 36.7, -119.7),
            (1, 3, 91.0, -86.0),
            (1, 3, 33.0, 999.0),
        ],
    );
    write_year(
        dir.path(),
        2014,
        &[(1, 2, 33.1, -86.2), (6, 12, 37.4, -121.9), (6, 12, 34.0, -118.2)],
    );
    write_year(dir.path(), 2015, &[(4, 7, 99.9999, 999.9999)]);

    let config = FarsConfig {
        data_dir: dir.path().to_path_buf(),
        output_dir: dir.path().to_path_buf(),
        base_map: None,
        map: MapOptions {
            width: 300,
            height: 200,
            point_radius: 2,
            labels: false,
        },
    };
    (dir, Fars::new(config))
}

#[test]
fn test_filename_accepts_any_numeric_year() {
    assert_eq!(make_filename(2013), make_filename(2013.0));
    assert_eq!(make_filename(2013_i64), "accident_2013.csv.bz2");
}

#[test]
fn test_read_nonexistent_file() {
    let err = fars_read("missing/accident_2013.csv.bz2").unwrap_err();
    assert!(matches!(err, FarsError::FileNotFound(_)));
    assert!(err.to_string().contains("missing/accident_2013.csv.bz2"));
}

#[test]
fn test_read_keeps_all_columns() {
    let (dir, fars) = fixture();
    let df = fars.read(dir.path().join("accident_2013.csv.bz2")).unwrap();
    assert_eq!(df.height(), 6);
    assert_eq!(df.width(), 7);
}

#[test]
fn test_read_years_with_invalid_year() {
    let (_dir, fars) = fixture();
    let read = fars.read_years(&[2013, 9999]);

    assert_eq!(read.tables.len(), 2);
    assert!(matches!(&read.tables[0], YearLoad::Loaded { year: 2013, table } if table.height() == 6));
    assert!(matches!(read.tables[1], YearLoad::Failed { year: 9999, .. }));
    assert_eq!(read.warnings.len(), 1);
    assert_eq!(read.warnings[0].year, 9999);
    assert!(read.warnings[0].to_string().contains("9999"));
}

#[test]
fn test_summarize_years() {
    let (_dir, fars) = fixture();
    let summary = fars.summarize_years(&[2014, 2013]).unwrap();

    assert_eq!(summary.years, vec![2013, 2014]);
    assert_eq!(summary.months(), vec![1, 2, 3, 12]);
    assert_eq!(summary.get(1, 2013), Some(3));
    assert_eq!(summary.get(2, 2013), Some(1));
    assert_eq!(summary.get(2, 2014), Some(1));
    assert_eq!(summary.get(3, 2013), Some(2));
    assert_eq!(summary.get(12, 2013), None);
    assert_eq!(summary.get(12, 2014), Some(2));
}

#[test]
fn test_summarize_skips_failed_years() {
    let (_dir, fars) = fixture();
    let summary = fars.summarize_years(&[2013.0, 1900.0]).unwrap();
    assert_eq!(summary.years, vec![2013]);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["years"], serde_json::json!([2013]));
    assert_eq!(json["rows"][0]["month"], 1);
}

#[test]
fn test_map_invalid_state() {
    let (_dir, fars) = fixture();
    let err = fars.map_state(99, 2013).unwrap_err();
    assert!(matches!(err, FarsError::InvalidState(99)));
    assert!(err.to_string().contains("99"));
}

#[test]
fn test_map_missing_year_file() {
    let (_dir, fars) = fixture();
    let err = fars.map_state(1, 1999).unwrap_err();
    assert!(matches!(err, FarsError::FileNotFound(_)));
}

#[test]
fn test_map_state_renders_known_coordinates() {
    let (dir, fars) = fixture();
    let outcome = fars.map_state(1, 2013).unwrap();

    let expected = dir.path().join("state_1_2013.png");
    assert_eq!(
        outcome,
        MapOutcome::Rendered {
            path: expected.clone(),
            points: 3,
            skipped: 2,
        }
    );
    assert!(expected.is_file());
}

#[test]
fn test_map_state_with_base_map() {
    let (dir, _) = fixture();
    std::fs::write(
        dir.path().join("us_states.geojson"),
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},
            "geometry":{"type":"Polygon","coordinates":[[[-88.5,30.2],[-84.9,30.2],[-84.9,35.0],[-88.5,35.0],[-88.5,30.2]]]}}]}"#,
    )
    .unwrap();
    let config = FarsConfig {
        data_dir: dir.path().to_path_buf(),
        output_dir: dir.path().to_path_buf(),
        map: MapOptions {
            labels: false,
            ..MapOptions::default()
        },
        ..FarsConfig::default()
    };
    let fars = Fars::new(config);

    let output = dir.path().join("alabama.png");
    let outcome = fars.map_state_to(1, 2013, &output).unwrap();
    assert!(matches!(outcome, MapOutcome::Rendered { points: 3, .. }));
    assert!(output.is_file());
}

#[test]
fn test_map_state_without_known_coordinates() {
    let (dir, fars) = fixture();
    let outcome = fars.map_state(4, 2015).unwrap();
    assert_eq!(outcome, MapOutcome::NoCoordinates { state: 4, year: 2015 });
    assert!(!dir.path().join("state_4_2015.png").exists());
}
