use bls_rs::inflation::CpiTable;
use bls_rs::{Error, ErrorKind};
use std::io::Write;
use tempfile::NamedTempFile;

fn cpi_file(body: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(body.as_bytes()).unwrap();
    f
}

#[test]
fn base_year_is_identity_for_any_table_with_2018() {
    for body in [
        "Year,CPI-U-RS Index\n2018,369.8\n",
        "Year,CPI-U-RS Index\n1990,196.3\n2018,369.8\n2019,376.5\n",
    ] {
        let f = cpi_file(body);
        let t = CpiTable::load(f.path()).unwrap();
        assert_eq!(t.ratio(2018).unwrap(), 1.0);
    }
}

#[test]
fn older_dollars_are_worth_more() {
    let f = cpi_file("Year,CPI-U-RS Index\n1990,196.3\n2018,369.8\n");
    let t = CpiTable::load(f.path()).unwrap();
    let r = t.ratio(1990).unwrap();
    assert!(r > 1.0);
    assert!((r - 369.8 / 196.3).abs() < 1e-12);
}

#[test]
fn missing_file_and_missing_year() {
    let err = CpiTable::load("/nonexistent/cpi_index.csv").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    let f = cpi_file("Year,CPI-U-RS Index\n2018,369.8\n");
    let t = CpiTable::load(f.path()).unwrap();
    assert!(matches!(t.ratio(2025), Err(Error::MissingYear(2025))));
}
