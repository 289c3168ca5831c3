//! Weekly closes from CSV files, one `<SYMBOL>.csv` per instrument.

use allocator_core::error::DataError;
use allocator_core::traits::HistorySource;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
}

/// Directory of per-symbol CSV histories.
pub struct CsvHistorySource {
    dir: PathBuf,
}

impl CsvHistorySource {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(DataError::Configuration(format!(
                "History directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Load `(timestamp ms, close)` rows sorted by time.
    pub fn load(&self, symbol: &str) -> Result<Vec<(i64, f64)>, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::Parse(e.to_string()))?;
            rows.push((parse_timestamp(&record.date)?, record.close));
        }
        rows.sort_by_key(|(ts, _)| *ts);

        debug!(symbol, rows = rows.len(), path = %path.display(), "Loaded CSV history");
        Ok(rows)
    }
}

/// Parse the date formats commonly found in exported price files.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    // Unix timestamps, seconds or milliseconds
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::Parse(format!("Could not parse date: {date_str}")))
}

#[async_trait]
impl HistorySource for CsvHistorySource {
    async fn get_weekly_closes(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<f64>, DataError> {
        let (from, to) = (from.timestamp_millis(), to.timestamp_millis());
        let closes: Vec<f64> = self
            .load(symbol)?
            .into_iter()
            .filter(|(ts, _)| *ts >= from && *ts <= to)
            .map(|(_, close)| close)
            .collect();

        if closes.is_empty() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("next tuesday").is_err());
    }

    #[tokio::test]
    async fn test_weekly_closes_in_range() {
        let dir = std::env::temp_dir().join(format!("allocator-csv-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("TLT.csv"),
            "Date,Open,High,Low,Close\n2024-01-15,1,1,1,92.5\n2024-01-01,1,1,1,90.0\n2024-01-08,1,1,1,91.0\n2023-06-01,1,1,1,99.0\n",
        )
        .unwrap();

        let source = CsvHistorySource::new(&dir).unwrap();
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let closes = source.get_weekly_closes("TLT", from, to).await.unwrap();
        assert_eq!(closes, vec![90.0, 91.0, 92.5]);

        assert_eq!(
            source.get_weekly_closes("GLD", from, to).await.unwrap_err(),
            DataError::SymbolNotFound("GLD".to_string())
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
