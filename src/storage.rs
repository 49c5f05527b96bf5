use crate::error::Result;
use crate::models::{StateFips, TidyTable, WideTable};
use csv::{Writer, WriterBuilder};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn safe_cell(s: &str) -> Cow<'_, str> {
    if s.starts_with(['=', '+', '-', '@']) {
        Cow::Owned(format!("'{}", s))
    } else {
        Cow::Borrowed(s)
    }
}

fn fmt_value(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Tidy CSV with header `State,Date,<value_name>`.
pub fn write_tidy_csv<W: Write>(tidy: &TidyTable, out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(out);
    wtr.write_record(["State", "Date", tidy.value_name.as_str()])?;
    for r in &tidy.records {
        let date = r.date.format(DATE_FORMAT).to_string();
        let value = fmt_value(r.value);
        wtr.write_record([&*safe_cell(&r.state), date.as_str(), value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_tidy_csv<P: AsRef<Path>>(tidy: &TidyTable, path: P) -> Result<()> {
    write_tidy_csv(tidy, File::create(path)?)
}

/// Save the tidy table as a pretty JSON array of `{State, Date, <value_name>}` objects.
pub fn save_tidy_json<P: AsRef<Path>>(tidy: &TidyTable, path: P) -> Result<()> {
    let rows: Vec<Value> = tidy
        .records
        .iter()
        .map(|r| {
            let mut obj = Map::new();
            obj.insert("State".into(), Value::from(r.state.as_str()));
            obj.insert("Date".into(), Value::from(r.date.format(DATE_FORMAT).to_string()));
            obj.insert(tidy.value_name.clone(), r.value.map(Value::from).unwrap_or(Value::Null));
            Value::Object(obj)
        })
        .collect();
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Wide CSV: a `Date` column followed by one column per state.
pub fn write_wide_csv<W: Write>(wide: &WideTable, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    let mut header = vec![Cow::Borrowed("Date")];
    header.extend(wide.columns().iter().map(|c| safe_cell(&c.name)));
    wtr.write_record(header.iter().map(|h| h.as_bytes()))?;
    for (i, date) in wide.dates().iter().enumerate() {
        let mut row = vec![date.format(DATE_FORMAT).to_string()];
        row.extend(wide.columns().iter().map(|c| fmt_value(c.values[i])));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_wide_csv<P: AsRef<Path>>(wide: &WideTable, path: P) -> Result<()> {
    write_wide_csv(wide, File::create(path)?)
}

/// FIPS table as `Name,FIPS` CSV.
pub fn write_fips_csv<W: Write>(states: &[StateFips], out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["Name", "FIPS"])?;
    for s in states {
        wtr.write_record([&*safe_cell(&s.name), s.fips.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_fips_csv<P: AsRef<Path>>(states: &[StateFips], path: P) -> Result<()> {
    write_fips_csv(states, File::create(path)?)
}
