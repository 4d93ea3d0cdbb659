//! Timeseries decoded next to a flamegraph.

use serde::{Deserialize, Serialize};

/// One named series of `(timestamp, value)` points
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Serie {
    pub name: String,
    pub data: Vec<(i64, i64)>,
}

impl Serie {
    pub fn new(name: impl Into<String>, data: Vec<(i64, i64)>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Sum of all values in the series, saturating at the `i64` bounds
    pub fn total(&self) -> i64 {
        self.data
            .iter()
            .fold(0_i64, |acc, (_, value)| acc.saturating_add(*value))
    }

    /// First and last timestamp, if the series has points
    pub fn time_range(&self) -> Option<(i64, i64)> {
        let first = self.data.iter().map(|(ts, _)| *ts).min()?;
        let last = self.data.iter().map(|(ts, _)| *ts).max()?;
        Some((first, last))
    }
}

/// All series of one graph response
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeseriesData {
    pub series: Vec<Serie>,
}

impl TimeseriesData {
    pub fn new(series: Vec<Serie>) -> Self {
        Self { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.data.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serie_range_and_total() {
        let serie = Serie::new("samples", vec![(3000, 4), (1000, 1), (2000, 5)]);
        assert_eq!(serie.time_range(), Some((1000, 3000)));
        assert_eq!(serie.total(), 10);
    }

    #[test]
    fn test_total_saturates() {
        let serie = Serie::new("s", vec![(0, i64::MAX), (1, 1)]);
        assert_eq!(serie.total(), i64::MAX);

        let serie = Serie::new("s", vec![(0, i64::MIN), (1, -1)]);
        assert_eq!(serie.total(), i64::MIN);
    }

    #[test]
    fn test_empty_serie() {
        let serie = Serie::new("empty", vec![]);
        assert_eq!(serie.time_range(), None);
        assert!(TimeseriesData::new(vec![serie]).is_empty());
    }
}
