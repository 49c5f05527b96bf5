//! Inflation adjustment with the CPI-U-RS index.
//!
//! `cpi_index.csv` has one row per year with columns `Year` and `CPI-U-RS Index`;
//! other columns are ignored.

use crate::config::{CPI_BASE_YEAR, DEFAULT_CPI_PATH};
use crate::error::{Error, Result};
use crate::models::CpiRecord;
use csv::{ReaderBuilder, Trim};
use log::debug;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct CpiTable {
    pub records: Vec<CpiRecord>,
}

impl CpiTable {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading CPI table from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(rdr);
        let records = rdr
            .deserialize::<CpiRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    /// Index value for `year`; the first matching row wins.
    pub fn index(&self, year: i32) -> Result<f64> {
        self.records
            .iter()
            .find(|r| r.year == year)
            .map(|r| r.cpi_index)
            .ok_or(Error::MissingYear(year))
    }

    /// Multiplier turning `year` dollars into `base` dollars.
    pub fn ratio_between(&self, base: i32, year: i32) -> Result<f64> {
        let base_cpi = self.index(base)?;
        let year_cpi = self.index(year)?;
        Ok(base_cpi / year_cpi)
    }

    /// Multiplier turning `year` dollars into 2018 dollars.
    pub fn ratio(&self, year: i32) -> Result<f64> {
        self.ratio_between(CPI_BASE_YEAR, year)
    }

    /// `amount` in `year` dollars, expressed in 2018 dollars.
    pub fn adjust(&self, amount: f64, year: i32) -> Result<f64> {
        Ok(amount * self.ratio(year)?)
    }
}

/// Ratio rebasing `year` dollars to 2018, read from `cpi_index.csv` in the working directory.
pub fn adjust_inflation(year: i32) -> Result<f64> {
    CpiTable::load(DEFAULT_CPI_PATH)?.ratio(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Year,CPI-U-RS Index,Note\n2000, 257.8,a\n2010,320.4,\n2018,369.8,b\n";

    #[test]
    fn base_year_ratio_is_one() {
        let t = CpiTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(t.ratio(2018).unwrap(), 1.0);
    }

    #[test]
    fn ratio_and_adjust() {
        let t = CpiTable::from_reader(CSV.as_bytes()).unwrap();
        let r = t.ratio(2000).unwrap();
        assert!((r - 369.8 / 257.8).abs() < 1e-12);
        assert!((t.adjust(100.0, 2000).unwrap() - 100.0 * r).abs() < 1e-9);
        assert!((t.ratio_between(2010, 2000).unwrap() - 320.4 / 257.8).abs() < 1e-12);
    }

    #[test]
    fn missing_years_are_lookup_misses() {
        let t = CpiTable::from_reader(CSV.as_bytes()).unwrap();
        assert!(matches!(t.ratio(1999), Err(Error::MissingYear(1999))));
        let no_base = CpiTable::from_reader("Year,CPI-U-RS Index\n2000,257.8\n".as_bytes()).unwrap();
        assert!(matches!(no_base.ratio(2000), Err(Error::MissingYear(2018))));
    }

    #[test]
    fn bad_rows_are_csv_errors() {
        let err = CpiTable::from_reader("Year,CPI-U-RS Index\nabc,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }
}
