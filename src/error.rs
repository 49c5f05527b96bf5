//! Error type shared by every part of the library.
//!
//! Failures fall into a handful of broad categories (see [`ErrorKind`]):
//! the network or server refused us, the server answered with something we
//! could not make sense of, or a lookup (year, series id, FIPS code) missed.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure (DNS, connect, timeout, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}")]
    Http { status: u16, url: String },

    /// BLS accepted the request but reported it as not processed.
    #[error("bls api error: {}", .0.join("; "))]
    Api(Vec<String>),

    /// Response or page did not have the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("series id {0} was not part of the request")]
    UnknownSeries(String),

    #[error("FIPS code {0} not found in state table")]
    UnknownFips(u8),

    #[error("year {0} not found in CPI table")]
    MissingYear(i32),

    /// Two tables could not be combined (different date index, duplicate cells).
    #[error("table shape mismatch: {0}")]
    Shape(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Coarse grouping of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Malformed,
    LookupMiss,
    Input,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) | Error::Http { .. } | Error::Api(_) => ErrorKind::Network,
            Error::Malformed(_) | Error::Json(_) | Error::Shape(_) => ErrorKind::Malformed,
            Error::UnknownSeries(_) | Error::UnknownFips(_) | Error::MissingYear(_) => {
                ErrorKind::LookupMiss
            }
            Error::InvalidArgument(_) => ErrorKind::Input,
            Error::Io(_) | Error::Csv(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = Error::Http {
            status: 503,
            url: "https://api.bls.gov/x".into(),
        };
        assert_eq!(
            err.to_string(),
            "request to https://api.bls.gov/x failed with HTTP 503"
        );
        let err = Error::Api(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "bls api error: first; second");
        assert_eq!(
            Error::MissingYear(1999).to_string(),
            "year 1999 not found in CPI table"
        );
    }

    #[test]
    fn kinds_group_variants() {
        assert_eq!(Error::Api(vec![]).kind(), ErrorKind::Network);
        assert_eq!(Error::Malformed("x".into()).kind(), ErrorKind::Malformed);
        assert_eq!(Error::UnknownFips(3).kind(), ErrorKind::LookupMiss);
        assert_eq!(Error::MissingYear(2018).kind(), ErrorKind::LookupMiss);
        assert_eq!(Error::UnknownSeries("X".into()).kind(), ErrorKind::LookupMiss);
        assert_eq!(Error::InvalidArgument("y".into()).kind(), ErrorKind::Input);
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
