use councillor_core::{load, CsvMerger, Error};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADERS: [&str; 13] = [
    "name",
    "start_date",
    "end_date",
    "executive",
    "council",
    "council website",
    "id",
    "email",
    "image",
    "party",
    "source",
    "ward",
    "phone_mobile",
];

fn julia() -> Vec<&'static str> {
    vec![
        "Julia Chessell",
        "",
        "",
        "",
        "Foo City Council",
        "http://www.foo.nsw.gov.au",
        "foo_city_council/julia_chessell",
        "jches@foocity.nsw.gov.au",
        "http://www.foo.nsw.gov.au/__data/assets/image/0018/11547/julia.jpg",
        "Independent",
        "http://www.foo.nsw.gov.au/inside-foo/about-council/councillors",
        "",
        "",
    ]
}

fn henare() -> Vec<&'static str> {
    vec![
        "Henare Degan",
        "",
        "",
        "",
        "Foo City Council",
        "http://www.foo.nsw.gov.au",
        "foo_city_council/henare_degan",
        "hdegan@foocity.nsw.gov.au",
        "http://www.foo.nsw.gov.au/__data/assets/image/0018/11547/henare.jpg",
        "Party Party Party",
        "http://www.foo.nsw.gov.au/inside-foo/about-council/councillors",
        "",
        "",
    ]
}

fn partial_henare() -> Vec<&'static str> {
    vec![
        "Henare Degan",
        "2010-09-01",
        "",
        "",
        "Foo City Council",
        "http://www.foo.nsw.gov.au",
        "foo_city_council/henare_degan",
        "",
        "",
        "",
        "",
        "",
        "",
    ]
}

fn hisayo() -> Vec<&'static str> {
    vec![
        "Hisayo Horie",
        "",
        "",
        "",
        "Foo City Council",
        "http://www.foo.nsw.gov.au",
        "foo_city_council/hisayo_horie",
        "hhorie@foocity.nsw.gov.au",
        "http://www.foo.nsw.gov.au/__data/assets/image/0018/11547/hisayo.jpg",
        "Make Toronto Nice Party",
        "http://www.foo.nsw.gov.au/inside-foo/about-council/councillors",
        "",
        "",
    ]
}

fn julia_update() -> Vec<&'static str> {
    vec![
        "Julia Chessell",
        "",
        "2017-09-28",
        "",
        "Foo City Council",
        "",
        "foo_city_council/julia_chessell",
        "",
        "",
        "",
        "",
        "",
        "",
    ]
}

fn write_csv(path: &Path, header: &[&str], rows: &[Vec<&str>]) {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .unwrap();
    writer.write_record(header).unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.flush().unwrap();
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let dataset = load(path).unwrap();
    let rows = dataset.rows.into_iter().map(|r| r.values).collect();
    (dataset.header, rows)
}

struct Fixture {
    _dir: TempDir,
    master: PathBuf,
    changes: PathBuf,
}

fn fixture(
    master_rows: &[Vec<&str>],
    changes_header: &[&str],
    changes_rows: &[Vec<&str>],
) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("local_councillors_master.csv");
    let changes = dir.path().join("local_councillors_changes.csv");
    write_csv(&master, &HEADERS, master_rows);
    write_csv(&changes, changes_header, changes_rows);
    Fixture {
        _dir: dir,
        master,
        changes,
    }
}

fn owned(rows: &[Vec<&str>]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|v| v.to_string()).collect())
        .collect()
}

#[test]
fn new_councillors_are_appended_without_altering_existing_rows() {
    let fx = fixture(&[julia()], &HEADERS, &[henare(), hisayo()]);

    let outcome = CsvMerger::new(&fx.master, &fx.changes).merge().unwrap();

    let (header, rows) = read_rows(&fx.master);
    assert_eq!(header, HEADERS);
    assert_eq!(rows, owned(&[julia(), henare(), hisayo()]));
    assert!(outcome.updated.is_empty());
    assert_eq!(
        outcome.appended,
        vec!["foo_city_council/henare_degan", "foo_city_council/hisayo_horie"]
    );
}

#[test]
fn matching_councillors_are_replaced_field_by_field() {
    let fx = fixture(&[julia(), partial_henare()], &HEADERS, &[julia_update(), hisayo()]);

    CsvMerger::new(&fx.master, &fx.changes).merge().unwrap();

    let (_, rows) = read_rows(&fx.master);
    assert_eq!(rows, owned(&[julia_update(), partial_henare(), hisayo()]));

    // A blank value in the change row clears the master value
    assert_eq!(rows[0][5], "");
    assert_eq!(rows[0][2], "2017-09-28");
}

#[test]
fn mismatched_headers_are_rejected_and_master_untouched() {
    let bad_header = ["foo", "bar", "baz", "zapadooo"];
    // Rows still carry all thirteen councillor fields under the foreign header
    let fx = fixture(&[julia()], &bad_header, &[henare(), hisayo()]);
    let before = fs::read_to_string(&fx.master).unwrap();

    let merger = CsvMerger::new(&fx.master, &fx.changes);
    assert!(matches!(merger.changes_valid(), Ok(false)));
    match merger.merge() {
        Err(Error::HeaderMismatch { expected, found }) => {
            assert_eq!(expected, HEADERS);
            assert_eq!(found, bad_header);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(fs::read_to_string(&fx.master).unwrap(), before);
}

#[test]
fn matching_headers_are_valid() {
    let fx = fixture(&[julia()], &HEADERS, &[henare()]);
    assert!(CsvMerger::new(&fx.master, &fx.changes).changes_valid().unwrap());
}

#[test]
fn empty_changes_leave_master_byte_identical() {
    let fx = fixture(&[julia(), henare()], &HEADERS, &[]);
    let before = fs::read_to_string(&fx.master).unwrap();

    CsvMerger::new(&fx.master, &fx.changes).merge().unwrap();

    assert_eq!(fs::read_to_string(&fx.master).unwrap(), before);
}

#[test]
fn missing_changes_file_is_not_found() {
    let fx = fixture(&[julia()], &HEADERS, &[]);
    fs::remove_file(&fx.changes).unwrap();
    let before = fs::read_to_string(&fx.master).unwrap();

    let err = CsvMerger::new(&fx.master, &fx.changes).merge().unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(fs::read_to_string(&fx.master).unwrap(), before);
}

#[test]
fn ragged_changes_file_is_malformed() {
    let fx = fixture(&[julia()], &HEADERS, &[]);
    fs::write(&fx.changes, format!("{}\nHisayo Horie,,\n", HEADERS.join(","))).unwrap();

    let err = CsvMerger::new(&fx.master, &fx.changes).merge().unwrap_err();
    assert!(matches!(err, Error::MalformedData { .. }));
}
