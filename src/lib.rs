//! bls_rs
//!
//! A small Rust library for retrieving state-level time series from the
//! Bureau of Labor Statistics (BLS) public API. Pairs with the `bls` CLI.
//!
//! ### Features
//! - Scrape the state FIPS table and build BLS series ids from it
//! - Fetch monthly series in batches and line them up in a wide table
//! - Reshape to a tidy (State, Date, Value) table and back
//! - Rebase dollar figures to 2018 with the CPI-U-RS index
//! - Save as CSV or JSON, print per-state summary statistics
//!
//! ### Example
//! ```no_run
//! use bls_rs::{Client, YearRange, config::Settings, series, tidy};
//!
//! let client = Client::new(&Settings::from_env())?;
//! let states = client.fetch_state_fips()?;
//! let map = series::build_series_map(&states, "LASST", "0000000000003");
//! let wide = client.fetch_all(&map, YearRange::new(2019, 2020)?)?;
//! let long = tidy::melt(&wide);
//! bls_rs::storage::save_tidy_csv(&long, "unemployment.csv")?;
//! let ratio = bls_rs::inflation::adjust_inflation(2010)?;
//! println!("2010 dollars x {ratio:.3} = 2018 dollars");
//! # Ok::<(), bls_rs::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fips;
pub mod inflation;
pub mod models;
pub mod series;
pub mod stats;
pub mod storage;
pub mod tidy;

pub use api::Client;
pub use error::{Error, ErrorKind, Result};
pub use models::{StateFips, TidyRecord, TidyTable, WideTable, YearRange};
pub use series::SeriesMap;
