//! Build BLS series ids from state FIPS codes.
//!
//! A LAUS (local area unemployment) series id looks like `LASST` + FIPS + suffix;
//! callers pass the parts around the two-digit state code.

use crate::models::StateFips;

/// `prefix` + two-digit FIPS code + `suffix`.
pub fn series_id(fips: u8, prefix: &str, suffix: &str) -> String {
    format!("{}{:02}{}", prefix, fips, suffix)
}

/// Ordered mapping of series id to state name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesMap {
    entries: Vec<(String, String)>,
}

impl SeriesMap {
    /// Later duplicates of a series id replace the earlier state name in place.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = Self::default();
        for (id, state) in pairs {
            map.insert(id, state);
        }
        map
    }

    pub fn insert(&mut self, id: String, state: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => entry.1 = state,
            None => self.entries.push((id, state)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Split by index order: the first half gets `len / 2` entries, the second the rest.
    ///
    /// The API answers a large batch with only part of the series, so callers query
    /// each half separately.
    pub fn split_halves(&self) -> (SeriesMap, SeriesMap) {
        let mid = self.entries.len() / 2;
        let (a, b) = self.entries.split_at(mid);
        (
            SeriesMap { entries: a.to_vec() },
            SeriesMap { entries: b.to_vec() },
        )
    }
}

/// Mapping of series id to state name for every row of `states`, in table order.
pub fn build_series_map(states: &[StateFips], prefix: &str, suffix: &str) -> SeriesMap {
    SeriesMap::from_pairs(
        states
            .iter()
            .map(|s| (series_id(s.fips, prefix, suffix), s.name.clone())),
    )
}

/// [`build_series_map`] followed by [`SeriesMap::split_halves`].
pub fn build_series_halves(states: &[StateFips], prefix: &str, suffix: &str) -> (SeriesMap, SeriesMap) {
    build_series_map(states, prefix, suffix).split_halves()
}
