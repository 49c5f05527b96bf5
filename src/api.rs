//! Synchronous client for the **BLS Public Data API (v2)** and the state FIPS page.
//!
//! The timeseries endpoint takes a batch of series ids and a year range in a JSON POST
//! and answers with one block of observations per series. [`Client::fetch_series`]
//! turns that into a [`WideTable`] (one column per state, monthly rows).
//!
//! ### Notes
//! - The API key goes in the URL path (`/timeseries/data/{key}`). Without a key the
//!   request still works but BLS applies much tighter limits.
//! - A large batch comes back with only part of the series; [`Client::fetch_all`]
//!   splits the mapping in two and issues one request per half.
//! - No retries. A failed request surfaces as [`Error::Network`] or [`Error::Http`].
//!
//! Typical usage:
//! ```no_run
//! # use bls_rs::{Client, YearRange, config::Settings, series};
//! let client = Client::new(&Settings::from_env())?;
//! let states = client.fetch_state_fips()?;
//! let map = series::build_series_map(&states, "LASST", "0000000000003");
//! let wide = client.fetch_all(&map, YearRange::new(2019, 2020)?)?;
//! # Ok::<(), bls_rs::Error>(())
//! ```
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::fips;
use crate::models::{ApiResponse, ApiSeries, SeriesRequest, StateFips, WideTable, YearRange};
use crate::series::SeriesMap;
use chrono::NaiveDate;
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

/// Series per request accepted by the v2 API with a registration key.
pub const MAX_SERIES_PER_REQUEST: usize = 50;

const REQUEST_SUCCEEDED: &str = "REQUEST_SUCCEEDED";

// Allow -, _, . unescaped in the key segment
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    pub fips_url: String,
    api_key: Option<String>,
    http: HttpClient,
}

impl Client {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(settings.timeout) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("bls_rs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: settings.api_base.clone(),
            fips_url: settings.fips_url.clone(),
            api_key: settings.api_key.clone(),
            http,
        })
    }

    /// Replace the API key (e.g. with one given on the command line).
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if key.is_some() {
            self.api_key = key;
        }
        self
    }

    fn data_endpoint(&self) -> String {
        format!("{}/timeseries/data/", self.base_url)
    }

    fn data_url(&self) -> String {
        match &self.api_key {
            Some(key) => format!(
                "{}{}",
                self.data_endpoint(),
                percent_encoding::utf8_percent_encode(key.trim(), SAFE)
            ),
            None => self.data_endpoint(),
        }
    }

    /// GET the FIPS page and parse its state table.
    pub fn fetch_state_fips(&self) -> Result<Vec<StateFips>> {
        debug!("GET {}", self.fips_url);
        let resp = self.http.get(&self.fips_url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: self.fips_url.clone(),
            });
        }
        let html = resp.text()?;
        fips::parse_fips_table(&html)
    }

    /// One POST for every series in `series`; returns one column per state.
    pub fn fetch_series(&self, series: &SeriesMap, years: YearRange) -> Result<WideTable> {
        if series.is_empty() {
            return Err(Error::InvalidArgument("at least one series id required".into()));
        }
        if series.len() > MAX_SERIES_PER_REQUEST {
            warn!(
                "requesting {} series in one call; the API accepts at most {}",
                series.len(),
                MAX_SERIES_PER_REQUEST
            );
        }
        if self.api_key.is_none() {
            warn!("no BLS API key configured; unregistered requests are heavily limited");
        }

        let body = SeriesRequest::new(series.ids().map(str::to_string).collect(), years);
        debug!(
            "POST {} ({} series, {}-{})",
            self.data_endpoint(),
            series.len(),
            years.start,
            years.end
        );
        let resp = self.http.post(self.data_url()).json(&body).send()?;
        let status = resp.status();
        if !status.is_success() {
            // the key is part of the URL, keep it out of error messages
            return Err(Error::Http {
                status: status.as_u16(),
                url: self.data_endpoint(),
            });
        }
        let text = resp.text()?;
        let parsed: ApiResponse = serde_json::from_str(&text)?;
        build_wide_table(parsed, series)
    }

    /// Query the two halves of `series` separately and join the results column-wise.
    pub fn fetch_all(&self, series: &SeriesMap, years: YearRange) -> Result<WideTable> {
        let (first, second) = series.split_halves();
        let mut out = WideTable::default();
        for half in [first, second] {
            if half.is_empty() {
                continue;
            }
            out = out.join(self.fetch_series(&half, years)?)?;
        }
        debug!("fetched {} columns x {} rows", out.n_cols(), out.n_rows());
        Ok(out)
    }
}

/// Monthly observations of one series, oldest first. Annual averages (`M13`) are dropped.
fn monthly_chronological(s: &ApiSeries) -> Result<Vec<(NaiveDate, Option<f64>)>> {
    let mut rows = Vec::with_capacity(s.data.len());
    for obs in &s.data {
        match obs.date()? {
            Some(d) => rows.push((d, obs.value)),
            None => debug!("{}: skipping non-monthly period {}", s.series_id, obs.period),
        }
    }
    rows.reverse();
    Ok(rows)
}

/// Turn a decoded timeseries response into a wide table.
///
/// The date index comes from the first series; every other series must cover the
/// same months. Columns are named by looking up each returned series id in `series`.
pub fn build_wide_table(resp: ApiResponse, series: &SeriesMap) -> Result<WideTable> {
    let ApiResponse {
        status,
        message,
        results,
    } = resp;

    let succeeded = status.as_deref().is_none_or(|s| s == REQUEST_SUCCEEDED);
    let results = match results {
        Some(r) if succeeded => r,
        _ => {
            let mut msgs = message;
            if msgs.is_empty() {
                msgs.push(status.unwrap_or_else(|| "response has no Results".into()));
            }
            return Err(Error::Api(msgs));
        }
    };
    for m in &message {
        warn!("bls: {}", m);
    }

    let Some(first) = results.series.first() else {
        return Err(Error::Malformed("response contains no series".into()));
    };
    let dates: Vec<NaiveDate> = monthly_chronological(first)?
        .into_iter()
        .map(|(d, _)| d)
        .collect();

    let mut table = WideTable::new(dates);
    for s in &results.series {
        let state = series
            .get(&s.series_id)
            .ok_or_else(|| Error::UnknownSeries(s.series_id.clone()))?;
        let rows = monthly_chronological(s)?;
        if rows.len() != table.n_rows()
            || rows.iter().zip(table.dates()).any(|((d, _), idx)| d != idx)
        {
            return Err(Error::Malformed(format!(
                "series {} does not cover the same months as {}",
                s.series_id, first.series_id
            )));
        }
        table.push_column(state, rows.into_iter().map(|(_, v)| v).collect())?;
    }
    Ok(table)
}
