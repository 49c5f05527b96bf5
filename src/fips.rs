//! State FIPS table scraped from an HTML page.
//!
//! The page holds several tables; the one we want is the first whose header row
//! has both a `Name` and a `FIPS` cell. Only the first [`STATE_COUNT`] rows are
//! kept, which drops the territories listed after the states.

use crate::config::STATE_COUNT;
use crate::error::{Error, Result};
use crate::models::StateFips;
use log::debug;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Malformed(format!("selector {}: {:?}", css, e)))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accepts `6`, `06` and `6.0`.
fn parse_fips(raw: &str) -> Result<u8> {
    let bad = || Error::Malformed(format!("bad FIPS cell {:?}", raw));
    let v = raw.trim().parse::<f64>().map_err(|_| bad())?;
    if !v.is_finite() || v.fract() != 0.0 || !(0.0..=99.0).contains(&v) {
        return Err(bad());
    }
    Ok(v as u8)
}

/// Parse the FIPS table out of an HTML document, keeping at most `STATE_COUNT` rows.
pub fn parse_fips_table(html: &str) -> Result<Vec<StateFips>> {
    let doc = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    for table in doc.select(&table_sel) {
        let mut rows = table.select(&row_sel);
        let Some(header) = rows.next() else { continue };
        let header: Vec<String> = header.select(&cell_sel).map(cell_text).collect();
        let name_idx = header.iter().position(|h| h == "Name");
        let fips_idx = header.iter().position(|h| h == "FIPS");
        let (Some(name_idx), Some(fips_idx)) = (name_idx, fips_idx) else {
            continue;
        };

        let mut out = Vec::with_capacity(STATE_COUNT);
        for row in rows.take(STATE_COUNT) {
            let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
            let (Some(name), Some(code)) = (cells.get(name_idx), cells.get(fips_idx)) else {
                return Err(Error::Malformed(format!(
                    "FIPS table row has {} cells, expected at least {}",
                    cells.len(),
                    name_idx.max(fips_idx) + 1
                )));
            };
            out.push(StateFips {
                name: name.clone(),
                fips: parse_fips(code)?,
            });
        }
        debug!("parsed {} FIPS rows", out.len());
        return Ok(out);
    }

    Err(Error::Malformed(
        "no table with Name and FIPS columns found".into(),
    ))
}

/// Rows of `table` whose code is in `codes`, in table order.
pub fn select(table: &[StateFips], codes: &[u8]) -> Result<Vec<StateFips>> {
    if let Some(missing) = codes.iter().find(|c| !table.iter().any(|s| s.fips == **c)) {
        return Err(Error::UnknownFips(*missing));
    }
    Ok(table
        .iter()
        .filter(|s| codes.contains(&s.fips))
        .cloned()
        .collect())
}

/// Look up the state with the given code.
pub fn lookup(table: &[StateFips], code: u8) -> Result<&StateFips> {
    table
        .iter()
        .find(|s| s.fips == code)
        .ok_or(Error::UnknownFips(code))
}
