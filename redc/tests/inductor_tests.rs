//! Integration tests for boost inductor selection

use redc::prelude::*;
use redc::ranker::select_inductors;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn sizes(parts: &[InductorRecord]) -> Vec<(&str, &str)> {
    parts
        .iter()
        .map(|p| (p.size.as_str(), p.category.as_str()))
        .collect()
}

#[test]
fn test_default_boost_with_builtin_catalog() {
    let catalog = Catalog::builtin().expect("Builtin catalog should load");
    let priorities = CategoryPriorityTable::default();

    let report = RedcCore::select_inductor(&catalog, &priorities, &InductorOptions::default())
        .expect("Should select inductor");

    assert!((report.ripple_current_a - 0.72).abs() < 1e-9);
    assert!((report.standard.ideal_value - 8.101851851851851).abs() < 1e-9);
    assert_eq!(report.standard.matched_value, 8.2);
    assert_eq!(report.standard.relative_error_percent, 1.21);

    assert_eq!(
        sizes(&report.parts),
        vec![
            ("0630", "Molded"),
            ("5040", "Shielded"),
            ("4018", "Semi-Shielded"),
            ("CD54", "Unshielded"),
        ]
    );
}

#[test]
fn test_noisy_catalog_unknown_categories_last() {
    let catalog = Catalog::from_path(&fixture_path("noisy_catalog.csv")).expect("Should load");
    assert_eq!(catalog.len(), 8);
    assert_eq!(catalog.skipped(), 2);

    let selection = select_inductors(&catalog, &CategoryPriorityTable::default(), 4.5)
        .expect("Should select inductor");
    assert_eq!(selection.standard.matched_value, 4.7);
    assert_eq!(
        sizes(&selection.parts),
        vec![
            ("0630", "Molded"),
            ("4030", "Shielded"),
            ("CD54", "Unshielded"),
            ("4018", "Toroid"),
            ("0630", "Ferrite Drum"),
        ]
    );
}

#[test]
fn test_custom_priorities() {
    let catalog = Catalog::from_path(&fixture_path("noisy_catalog.csv")).expect("Should load");
    let priorities = CategoryPriorityTable::from_path(&fixture_path("priorities.json"))
        .expect("Should load priorities");

    let selection = select_inductors(&catalog, &priorities, 5.0).expect("Should select inductor");
    let categories: Vec<&str> = selection.parts.iter().map(|p| p.category.as_str()).collect();
    assert_eq!(
        categories,
        vec!["Unshielded", "Shielded", "Molded", "Toroid", "Ferrite Drum"]
    );
}

#[test]
fn test_catalog_without_valid_rows() {
    let catalog = Catalog::from_path(&fixture_path("empty_catalog.csv")).expect("Should load");
    assert!(catalog.is_empty());
    assert_eq!(catalog.skipped(), 2);

    let err = RedcCore::select_inductor(
        &catalog,
        &CategoryPriorityTable::default(),
        &InductorOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RedcError::EmptyCandidateSet(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_synthetic_catalog() {
    let catalog = Catalog::from_records(vec![
        InductorRecord::new("A", "10uH", "1", "1", "Unshielded").unwrap(),
        InductorRecord::new("B", "0.01mH", "1", "1", "Molded").unwrap(),
        InductorRecord::new("C", "22uH", "1", "1", "Molded").unwrap(),
    ]);

    let selection = select_inductors(&catalog, &CategoryPriorityTable::default(), 12.0)
        .expect("Should select inductor");
    assert_eq!(selection.standard.matched_value, 10.0);
    let names: Vec<&str> = selection.parts.iter().map(|p| p.size.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn test_buck_inputs_rejected() {
    let options = InductorOptions {
        vin: 12.0,
        vout: 5.0,
        ..InductorOptions::default()
    };
    let err = RedcCore::select_inductor(
        &Catalog::builtin().unwrap(),
        &CategoryPriorityTable::default(),
        &options,
    )
    .unwrap_err();
    assert!(matches!(err, RedcError::InvalidInput(_)));
}

#[test]
fn test_catalog_from_user_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parts.csv");
    std::fs::write(
        &path,
        "size,inductance,dcr,saturation_current,category\n\
         1265,100uH,230mΩ,1.6A,Molded\n\
         CD75,0.1mH,340mΩ,1.1A,Unshielded\n\
         1050,68uH,210mΩ,1.5A,Shielded\n",
    )
    .unwrap();

    let catalog = Catalog::from_path(&path).expect("Should load");
    assert_eq!(catalog.len(), 3);

    let selection = select_inductors(&catalog, &CategoryPriorityTable::default(), 90.0)
        .expect("Should select inductor");
    assert_eq!(selection.standard.matched_value, 100.0);
    assert_eq!(
        sizes(&selection.parts),
        vec![("1265", "Molded"), ("CD75", "Unshielded")]
    );
}

#[test]
fn test_vendor_catalog_categories() {
    let catalog = Catalog::from_path(&fixture_path("vendor_catalog.csv")).expect("Should load");
    assert_eq!(catalog.skipped(), 0);

    let selection = select_inductors(&catalog, &CategoryPriorityTable::default(), 4.5)
        .expect("Should select inductor");
    assert_eq!(selection.standard.matched_value, 4.7);
    assert_eq!(
        sizes(&selection.parts),
        vec![
            ("0530", "一体成型电感"),
            ("0420", "小型化一体成型电感"),
            ("0650", "车规级一体成型电感"),
            ("1040", "T-CORE超大电流电感"),
            ("CD54", "铁氧体绕线"),
            ("6045", "磁屏蔽罩"),
        ]
    );
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

#[test]
fn test_every_catalog_source_logs_summary() {
    let (catalog, logs) = capture_logs(Catalog::builtin);
    let catalog = catalog.expect("Builtin catalog should load");
    assert!(
        logs.contains(&format!("Loaded {} inductors (0 rows skipped)", catalog.len())),
        "{}",
        logs
    );

    let (_, logs) = capture_logs(|| Catalog::from_csv_str("size,inductance\n4030,4.7uH\nX,bad\n"));
    assert!(logs.contains("Loaded 1 inductors (1 rows skipped)"), "{}", logs);
    assert!(logs.contains("Skipping catalog line 3"), "{}", logs);

    let (_, logs) = capture_logs(|| Catalog::from_path(&fixture_path("noisy_catalog.csv")));
    assert!(logs.contains("Loaded 8 inductors (2 rows skipped)"), "{}", logs);
}
