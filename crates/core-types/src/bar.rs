use crate::error::CoreError;
use crate::series::{PriceSeries, TimeSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLC observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    fn validate(&self) -> Result<(), CoreError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(CoreError::InvalidInput(
                "bar".to_string(),
                format!("prices must be positive and finite at {}", self.timestamp),
            ));
        }
        if self.high < self.low {
            return Err(CoreError::InvalidInput(
                "bar".to_string(),
                format!(
                    "high {} is below low {} at {}",
                    self.high, self.low, self.timestamp
                ),
            ));
        }
        Ok(())
    }
}

/// An ordered sequence of OHLC bars with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, CoreError> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate()?;
            if i > 0 && bars[i - 1].timestamp >= bar.timestamp {
                return Err(CoreError::InvalidInput(
                    "timestamp".to_string(),
                    format!(
                        "timestamps must be strictly increasing, {} follows {}",
                        bar.timestamp,
                        bars[i - 1].timestamp
                    ),
                ));
            }
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The closing prices as a price series.
    pub fn closes(&self) -> PriceSeries {
        let points = self.bars.iter().map(|b| (b.timestamp, b.close)).collect();
        // Bars are validated on construction, so closes are positive and ordered.
        PriceSeries::from_validated(TimeSeries::from_validated(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn accepts_consistent_bars() {
        let series = BarSeries::new(vec![
            bar(1, 10.0, 11.0, 9.5, 10.5),
            bar(2, 10.5, 12.0, 10.0, 11.0),
        ])
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes().values().collect::<Vec<_>>(), vec![10.5, 11.0]);
    }

    #[test]
    fn rejects_inverted_range_and_bad_order() {
        assert!(BarSeries::new(vec![bar(1, 10.0, 9.0, 11.0, 10.0)]).is_err());
        assert!(BarSeries::new(vec![bar(1, 0.0, 11.0, 9.0, 10.0)]).is_err());
        assert!(
            BarSeries::new(vec![
                bar(2, 10.0, 11.0, 9.0, 10.0),
                bar(1, 10.0, 11.0, 9.0, 10.0),
            ])
            .is_err()
        );
    }
}
