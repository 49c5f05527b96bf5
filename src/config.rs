//! Endpoint and file defaults, with environment overrides.

use std::path::PathBuf;
use std::time::Duration;

/// BLS public API, version 2.
pub const BLS_API_BASE: &str = "https://api.bls.gov/publicAPI/v2";

/// USDA NRCS page listing state names, postal codes and FIPS codes.
pub const FIPS_URL: &str = "https://www.nrcs.usda.gov/wps/portal/nrcs/detail/?cid=nrcs143_013696";

pub const DEFAULT_CPI_PATH: &str = "cpi_index.csv";

/// Dollar figures are rebased to this year.
pub const CPI_BASE_YEAR: i32 = 2018;

/// Rows kept from the FIPS table (the 50 states; territories follow them).
pub const STATE_COUNT: usize = 50;

pub const API_KEY_ENV: &str = "BLS_API_KEY";
pub const API_BASE_ENV: &str = "BLS_API_BASE";
pub const FIPS_URL_ENV: &str = "BLS_FIPS_URL";
pub const CPI_PATH_ENV: &str = "BLS_CPI_PATH";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: String,
    pub fips_url: String,
    pub cpi_path: PathBuf,
    pub api_key: Option<String>,
    /// Total request timeout.
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: BLS_API_BASE.into(),
            fips_url: FIPS_URL.into(),
            cpi_path: PathBuf::from(DEFAULT_CPI_PATH),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    /// Defaults overridden by `BLS_*` environment variables. Empty values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`Settings::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut s = Self::default();
        if let Some(v) = get(API_BASE_ENV) {
            s.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get(FIPS_URL_ENV) {
            s.fips_url = v;
        }
        if let Some(v) = get(CPI_PATH_ENV) {
            s.cpi_path = PathBuf::from(v);
        }
        s.api_key = get(API_KEY_ENV);
        s
    }
}
