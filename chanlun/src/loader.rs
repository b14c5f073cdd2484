//! CSV K 线加载。
//!
//! 列名大小写不敏感：`date|datetime|time|timestamp, open, high, low, close[, volume]`。
//! 空单元格按缺失字段处理，交由 `BarNormalizer` 报告。

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;
use serde::Deserialize;
use tracing::info;

use crate::bar::{Bar, BarNormalizer, RawBar};
use crate::constant::ChanError;

#[derive(Debug, Deserialize)]
struct CsvBarRow {
    #[serde(alias = "datetime", alias = "time", alias = "timestamp")]
    date: Option<String>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
}

pub fn load_raw_bars(file_path: impl AsRef<Path>) -> Result<Vec<RawBar>, ChanError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path.as_ref())?;
    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|x| x.to_ascii_lowercase())
        .collect();
    reader.set_headers(headers);

    let mut out = Vec::new();
    for row in reader.deserialize::<CsvBarRow>() {
        let row = row?;
        let timestamp = match row.date.as_deref().filter(|x| !x.is_empty()) {
            Some(raw) => Some(parse_datetime(raw)?),
            None => None,
        };
        out.push(RawBar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row
                .volume
                .filter(|x| x.is_finite() && *x >= 0.0)
                .map(|x| x.round() as u64),
        });
    }

    info!(
        path = %file_path.as_ref().display(),
        rows = out.len(),
        "csv bars loaded"
    );
    Ok(out)
}

pub fn load_bars(file_path: impl AsRef<Path>) -> Result<Vec<Bar>, ChanError> {
    BarNormalizer::normalize(load_raw_bars(file_path)?)
}

pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ChanError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    let datetime_patterns = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M",
        "%Y%m%d%H%M%S%.f",
    ];
    for pattern in datetime_patterns {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    for pattern in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Some(dt) = NaiveDate::parse_from_str(value, pattern)
            .ok()
            .and_then(|x| x.and_hms_opt(0, 0, 0))
        {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(ChanError::InvalidDatetime(value.to_string()))
}
