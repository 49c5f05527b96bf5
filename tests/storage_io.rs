use bls_rs::{TidyRecord, TidyTable, storage, tidy};
use chrono::NaiveDate;
use std::fs;

fn sample(n: u32) -> TidyTable {
    TidyTable {
        value_name: "Pct_Unemployed".into(),
        records: (1..=n)
            .map(|m| TidyRecord {
                state: "Ohio".into(),
                date: NaiveDate::from_ymd_opt(2020, m, 1).unwrap(),
                value: Some(4.0 + m as f64 / 10.0),
            })
            .collect(),
    }
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("tidy.csv");
    storage::save_tidy_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("State,Date,Pct_Unemployed\n"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.records.len());

    let json_path = dir.path().join("tidy.json");
    storage::save_tidy_json(&rows, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    assert_eq!(v.as_array().unwrap().len(), rows.records.len());
    assert_eq!(v[2]["Date"], "2020-03-01");
}

#[test]
fn saved_wide_csv_reads_back_into_the_same_table() {
    let long = sample(4);
    let wide = tidy::pivot(&long).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.csv");
    storage::save_wide_csv(&wide, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    assert_eq!(
        rdr.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["Date", "Ohio"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "2020-01-01");
    assert_eq!(rows[0][1].parse::<f64>().unwrap(), 4.1);
}

// CSV files are often opened in spreadsheets; text cells that look like formulas
// are prefixed with a single quote so they are not evaluated.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let t = TidyTable {
        value_name: "v".into(),
        records: vec![TidyRecord {
            state: "@SUM(A1:A9)".into(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            value: Some(-1.5),
        }],
    };
    let mut buf = Vec::new();
    storage::write_tidy_csv(&t, &mut buf).unwrap();

    let mut rdr = csv::Reader::from_reader(buf.as_slice());
    let row = rdr.records().next().expect("one data row expected").unwrap();
    assert_eq!(&row[0], "'@SUM(A1:A9)");
    // numeric cells are left alone
    assert_eq!(&row[2], "-1.5");
}
