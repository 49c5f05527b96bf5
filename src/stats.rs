use crate::models::TidyTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub state: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Most recent non-missing observation.
    pub latest: Option<(NaiveDate, f64)>,
}

/// Compute statistics per state, sorted by state name.
pub fn state_summary(tidy: &TidyTable) -> Vec<Summary> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut missing: BTreeMap<&str, usize> = BTreeMap::new();
    let mut latest: BTreeMap<&str, (NaiveDate, f64)> = BTreeMap::new();
    for r in &tidy.records {
        let key = r.state.as_str();
        match r.value {
            Some(v) => {
                groups.entry(key).or_default().push(v);
                let slot = latest.entry(key).or_insert((r.date, v));
                if r.date > slot.0 {
                    *slot = (r.date, v);
                }
            }
            None => {
                groups.entry(key).or_default();
                *missing.entry(key).or_default() += 1;
            }
        }
    }

    let mut out = Vec::new();
    for (key, mut vals) in groups {
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            state: key.to_string(),
            count,
            missing: missing.get(key).cloned().unwrap_or(0),
            min,
            max,
            mean,
            median,
            latest: latest.get(key).cloned(),
        });
    }
    out
}
