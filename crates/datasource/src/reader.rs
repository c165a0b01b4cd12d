use crate::column::{PriceColumn, TIMESTAMP_ALIASES, normalize_header};
use crate::error::DataError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use core_types::{Bar, BarSeries, PriceSeries};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads one price column of a CSV file into a [`PriceSeries`].
///
/// Rows may come in any order (vendors often write newest first); the
/// series is sorted ascending. Rows whose selected column is empty or `null`
/// are skipped.
pub fn read_prices<R: Read>(reader: R, column: PriceColumn) -> Result<PriceSeries, DataError> {
    let mut csv = csv_reader(reader);
    let headers = csv.headers()?.clone();
    let timestamp_idx = find_column(&headers, TIMESTAMP_ALIASES, "timestamp")?;
    let value_idx = find_column(&headers, column.aliases(), column.name())?;

    let mut points = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = line_of(&record);
        let timestamp = parse_timestamp(field(&record, timestamp_idx), line)?;

        let Some(value) = parse_price(field(&record, value_idx), line, column.name())? else {
            tracing::warn!(line, column = %column, "Skipping row without a price");
            continue;
        };
        points.push((timestamp, value));
    }

    points.sort_by_key(|(timestamp, _)| *timestamp);
    Ok(PriceSeries::new(points)?)
}

/// Opens `path` and reads one of its price columns.
pub fn load_prices(path: impl AsRef<Path>, column: PriceColumn) -> Result<PriceSeries, DataError> {
    let path = path.as_ref();
    let prices = read_prices(File::open(path)?, column)?;
    tracing::info!(path = %path.display(), column = %column, points = prices.len(), "Loaded price series");
    Ok(prices)
}

/// Reads the open, high, low and close columns of a CSV file into a
/// [`BarSeries`], sorted ascending. Rows missing any of the four are skipped.
pub fn read_bars<R: Read>(reader: R) -> Result<BarSeries, DataError> {
    let mut csv = csv_reader(reader);
    let headers = csv.headers()?.clone();
    let timestamp_idx = find_column(&headers, TIMESTAMP_ALIASES, "timestamp")?;

    let ohlc = [PriceColumn::Open, PriceColumn::High, PriceColumn::Low, PriceColumn::Close];
    let mut indices = [0usize; 4];
    for (slot, column) in indices.iter_mut().zip(ohlc) {
        *slot = find_column(&headers, column.aliases(), column.name())?;
    }

    let mut bars = Vec::new();
    'rows: for record in csv.records() {
        let record = record?;
        let line = line_of(&record);
        let timestamp = parse_timestamp(field(&record, timestamp_idx), line)?;

        let mut prices = [0.0f64; 4];
        for ((price, idx), column) in prices.iter_mut().zip(indices).zip(ohlc) {
            match parse_price(field(&record, idx), line, column.name())? {
                Some(value) => *price = value,
                None => {
                    tracing::warn!(line, column = %column, "Skipping bar with a missing price");
                    continue 'rows;
                }
            }
        }

        let [open, high, low, close] = prices;
        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
        });
    }

    bars.sort_by_key(|bar| bar.timestamp);
    Ok(BarSeries::new(bars)?)
}

/// Opens `path` and reads its OHLC bars.
pub fn load_bars(path: impl AsRef<Path>) -> Result<BarSeries, DataError> {
    let path = path.as_ref();
    let bars = read_bars(File::open(path)?)?;
    tracing::info!(path = %path.display(), bars = bars.len(), "Loaded bar series");
    Ok(bars)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn find_column(headers: &StringRecord, aliases: &[&str], name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|header| aliases.contains(&normalize_header(header).as_str()))
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |position| position.line())
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and plain `YYYY-MM-DD` (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str, line: u64) -> Result<DateTime<Utc>, DataError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(timestamp.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc())
        .ok_or_else(|| DataError::Parse {
            line,
            message: format!("unrecognised timestamp '{raw}'"),
        })
}

/// `None` for an empty or `null` cell.
fn parse_price(raw: &str, line: u64, column: &str) -> Result<Option<f64>, DataError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| DataError::Parse {
        line,
        message: format!("'{raw}' in column {column} is not a number"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const YAHOO: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,100.0,102.0,99.0,101.0,100.5,1000
2024-01-03,101.0,103.0,100.0,102.0,101.5,1200
2024-01-04,102.0,102.5,98.0,99.0,98.5,900
";

    #[test]
    fn reads_selected_column() {
        let closes = read_prices(YAHOO.as_bytes(), PriceColumn::Close).unwrap();
        assert_eq!(closes.values().collect::<Vec<_>>(), vec![101.0, 102.0, 99.0]);
        assert_eq!(
            closes.first().map(|(ts, _)| ts),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );

        let adjusted = read_prices(YAHOO.as_bytes(), PriceColumn::AdjustedClose).unwrap();
        assert_eq!(adjusted.values().collect::<Vec<_>>(), vec![100.5, 101.5, 98.5]);
    }

    #[test]
    fn sorts_newest_first_files() {
        let data = "\
timestamp,1. open,2. high,3. low,4. close,5. adjusted close
2024-01-04 16:00:00,102.0,102.5,98.0,99.0,98.5
2024-01-03 16:00:00,101.0,103.0,100.0,102.0,101.5
";
        let closes = read_prices(data.as_bytes(), PriceColumn::Close).unwrap();
        assert_eq!(closes.values().collect::<Vec<_>>(), vec![102.0, 99.0]);

        let bars = read_bars(data.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars.bars()[0].high, 103.0);
    }

    #[test]
    fn skips_rows_without_a_price() {
        let data = "\
date,close
2024-01-02,10.0
2024-01-03,
2024-01-04,null
2024-01-05,11.0
";
        let closes = read_prices(data.as_bytes(), PriceColumn::Close).unwrap();
        assert_eq!(closes.len(), 2);
    }

    #[test]
    fn reports_missing_columns_and_bad_values() {
        assert!(matches!(
            read_prices("date,open\n2024-01-02,1.0\n".as_bytes(), PriceColumn::Close),
            Err(DataError::MissingColumn(name)) if name == "close"
        ));
        assert!(matches!(
            read_prices("price\n1.0\n".as_bytes(), PriceColumn::Close),
            Err(DataError::MissingColumn(name)) if name == "timestamp"
        ));
        assert!(matches!(
            read_prices("date,close\n2024-01-02,abc\n".as_bytes(), PriceColumn::Close),
            Err(DataError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            read_prices("date,close\n02/01/2024,1.0\n".as_bytes(), PriceColumn::Close),
            Err(DataError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_invalid_series() {
        assert!(matches!(
            read_prices("date,close\n2024-01-02,1.0\n2024-01-02,2.0\n".as_bytes(), PriceColumn::Close),
            Err(DataError::Core(_))
        ));
        assert!(matches!(
            read_prices("date,close\n2024-01-02,-1.0\n".as_bytes(), PriceColumn::Close),
            Err(DataError::Core(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_prices("does/not/exist.csv", PriceColumn::Close),
            Err(DataError::Io(_))
        ));
        assert!(matches!(load_bars("does/not/exist.csv"), Err(DataError::Io(_))));
    }

    #[test]
    fn parses_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01", 1).unwrap(), midnight);
        assert_eq!(parse_timestamp("2024-03-01 00:00:00", 1).unwrap(), midnight);
        assert_eq!(parse_timestamp("2024-03-01T02:00:00+02:00", 1).unwrap(), midnight);
    }
}
