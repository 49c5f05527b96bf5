//! Reshape between the wide layout (one column per state) and the tidy layout
//! (one row per state and month).

use crate::error::{Error, Result};
use crate::models::{TidyRecord, TidyTable, WideTable};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_VALUE_NAME: &str = "Pct_Unemployed";

/// Unpivot `wide` with the value column named `Pct_Unemployed`.
pub fn melt(wide: &WideTable) -> TidyTable {
    melt_as(wide, DEFAULT_VALUE_NAME)
}

/// Unpivot `wide`: every state column in order, each walked in date order.
pub fn melt_as(wide: &WideTable, value_name: &str) -> TidyTable {
    let mut records = Vec::with_capacity(wide.n_cols() * wide.n_rows());
    for col in wide.columns() {
        for (date, value) in wide.dates().iter().zip(&col.values) {
            records.push(TidyRecord {
                state: col.name.clone(),
                date: *date,
                value: *value,
            });
        }
    }
    TidyTable {
        value_name: value_name.to_string(),
        records,
    }
}

/// Inverse of [`melt`]. Dates are sorted ascending, states keep first-appearance
/// order, and cells with no record are `None`.
///
/// The date index is rebuilt from the records, so a wide table with dates but no
/// state columns melts to nothing and pivots back to an empty table.
pub fn pivot(tidy: &TidyTable) -> Result<WideTable> {
    let dates: Vec<NaiveDate> = tidy
        .records
        .iter()
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let row_of: HashMap<NaiveDate, usize> = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut order: Vec<&str> = Vec::new();
    let mut cells: HashMap<&str, Vec<Option<Option<f64>>>> = HashMap::new();
    for r in &tidy.records {
        let col = cells.entry(r.state.as_str()).or_insert_with(|| {
            order.push(r.state.as_str());
            vec![None; dates.len()]
        });
        let slot = &mut col[row_of[&r.date]];
        if slot.is_some() {
            return Err(Error::Shape(format!(
                "duplicate entry for {} on {}",
                r.state, r.date
            )));
        }
        *slot = Some(r.value);
    }

    let mut wide = WideTable::new(dates);
    for state in order {
        let values = cells
            .remove(state)
            .unwrap_or_default()
            .into_iter()
            .map(Option::flatten)
            .collect();
        wide.push_column(state, values)?;
    }
    Ok(wide)
}
