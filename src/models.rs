use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive range of years sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "start year {} is after end year {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY` (single year) or `YYYY:YYYY`.
    pub fn parse(s: &str) -> Result<Self> {
        let bad = || Error::InvalidArgument(format!("invalid year range {:?}, expected YYYY or YYYY:YYYY", s));
        match s.trim().split_once(':') {
            Some((a, b)) => {
                let start = a.trim().parse::<i32>().map_err(|_| bad())?;
                let end = b.trim().parse::<i32>().map_err(|_| bad())?;
                Self::new(start, end)
            }
            None => {
                let y = s.trim().parse::<i32>().map_err(|_| bad())?;
                Self::new(y, y)
            }
        }
    }
}

/// One row of the state FIPS table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFips {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FIPS")]
    pub fips: u8,
}

/// JSON body of a timeseries request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRequest {
    pub seriesid: Vec<String>,
    pub startyear: String,
    pub endyear: String,
}

impl SeriesRequest {
    pub fn new(series_ids: Vec<String>, years: YearRange) -> Self {
        Self {
            seriesid: series_ids,
            startyear: years.start.to_string(),
            endyear: years.end.to_string(),
        }
    }
}

/// Top-level timeseries response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub status: Option<String>,
    #[serde(default)]
    pub message: Vec<String>,
    #[serde(rename = "Results")]
    pub results: Option<ApiResults>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResults {
    #[serde(default)]
    pub series: Vec<ApiSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSeries {
    #[serde(rename = "seriesID")]
    pub series_id: String,
    #[serde(default)]
    pub data: Vec<Observation>,
}

/// Raw observation. BLS lists these newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    pub year: String,
    /// `M01`..`M12`, or `M13` for the annual average.
    pub period: String,
    /// BLS sends values as strings and uses `-` when a value is unavailable.
    #[serde(deserialize_with = "de_opt_f64_from_string_or_number")]
    pub value: Option<f64>,
}

impl Observation {
    /// Month-start date of the observation; `None` for non-monthly periods.
    pub fn date(&self) -> Result<Option<NaiveDate>> {
        let year = self
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::Malformed(format!("bad year {:?}", self.year)))?;
        let month = self
            .period
            .strip_prefix('M')
            .and_then(|m| m.parse::<u32>().ok())
            .ok_or_else(|| Error::Malformed(format!("bad period {:?}", self.period)))?;
        if month == 13 {
            return Ok(None);
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Some)
            .ok_or_else(|| Error::Malformed(format!("bad period {:?} in {}", self.period, year)))
    }
}

/// Serde helper: `"3.9"`, `3.9` and `"-"` (as `None`).
fn de_opt_f64_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number, a numeric string, or \"-\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Self::Value, E> {
            let s = s.trim();
            if s.is_empty() || s == "-" {
                return Ok(None);
            }
            s.parse::<f64>().map(Some).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Monthly values indexed by date, one column per state.
///
/// Every column holds exactly one value per date; the fields are private so the
/// only way in is through [`WideTable::push_column`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl WideTable {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Build a table from ready-made columns, checking each against the date index.
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new(dates);
        for col in columns {
            table.push_column(col.name, col.values)?;
        }
        Ok(table)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(Error::Shape(format!(
                "column {} has {} values, index has {} dates",
                name,
                values.len(),
                self.dates.len()
            )));
        }
        if self.column(&name).is_some() {
            return Err(Error::Shape(format!("duplicate column {}", name)));
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Append the columns of `other`. Both tables must share the same date index,
    /// unless `self` has no columns yet.
    pub fn join(mut self, other: WideTable) -> Result<WideTable> {
        if self.columns.is_empty() {
            return Ok(other);
        }
        if self.dates != other.dates {
            return Err(Error::Shape(format!(
                "date index differs ({} vs {} rows)",
                self.dates.len(),
                other.dates.len()
            )));
        }
        for col in other.columns {
            self.push_column(col.name, col.values)?;
        }
        Ok(self)
    }

    pub fn sort_columns(&mut self) {
        self.columns.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// Tidy structure (one row = one state-month observation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TidyRecord {
    pub state: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TidyTable {
    /// Header used for the value column on output.
    pub value_name: String,
    pub records: Vec<TidyRecord>,
}

/// One row of `cpi_index.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpiRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "CPI-U-RS Index")]
    pub cpi_index: f64,
}
