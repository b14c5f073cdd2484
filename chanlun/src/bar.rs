//! K 线输入与校验（Bar Normalizer）。
//!
//! `RawBar` 是未经校验的原始输入，所有字段均可缺失；
//! `BarNormalizer` 负责必填字段检查、OHLC 一致性检查、按时间排序并分配序号。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constant::ChanError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl Bar {
    /// 检查单根 K 线的价格约束。
    pub fn check(&self) -> Result<(), ChanError> {
        let invalid = |reason: &str| ChanError::InvalidBar {
            index: self.index,
            reason: reason.to_string(),
        };
        if ![self.open, self.high, self.low, self.close]
            .iter()
            .all(|x| x.is_finite())
        {
            return Err(invalid("non-finite price"));
        }
        if self.high < self.low {
            return Err(invalid("high is below low"));
        }
        if self.open > self.high || self.close > self.high {
            return Err(invalid("open/close above high"));
        }
        if self.open < self.low || self.close < self.low {
            return Err(invalid("open/close below low"));
        }
        Ok(())
    }
}

/// 未经校验的原始 K 线。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBar {
    pub timestamp: Option<DateTime<Utc>>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }
}

pub struct BarNormalizer;

impl BarNormalizer {
    /// 校验、排序并分配 0 起始的序号。
    ///
    /// 排序是稳定的；排序后出现相同时间戳视为非单调输入。
    pub fn normalize(rows: Vec<RawBar>) -> Result<Vec<Bar>, ChanError> {
        let mut bars = Vec::with_capacity(rows.len());
        for (row, raw) in rows.into_iter().enumerate() {
            let bar = Bar {
                index: row,
                timestamp: raw.timestamp.ok_or(ChanError::MissingField {
                    row,
                    field: "timestamp",
                })?,
                open: raw.open.ok_or(ChanError::MissingField { row, field: "open" })?,
                high: raw.high.ok_or(ChanError::MissingField { row, field: "high" })?,
                low: raw.low.ok_or(ChanError::MissingField { row, field: "low" })?,
                close: raw.close.ok_or(ChanError::MissingField { row, field: "close" })?,
                volume: raw.volume,
            };
            bar.check()?;
            bars.push(bar);
        }

        bars.sort_by_key(|x| x.timestamp);
        for (index, bar) in bars.iter_mut().enumerate() {
            bar.index = index;
        }
        Self::validate(&bars)?;
        Ok(bars)
    }

    /// 校验已排好序的序列：序号连续、时间严格递增、价格约束成立。
    pub fn validate(bars: &[Bar]) -> Result<(), ChanError> {
        for (position, bar) in bars.iter().enumerate() {
            if bar.index != position {
                return Err(ChanError::InvalidBar {
                    index: position,
                    reason: format!("index {} does not match position", bar.index),
                });
            }
            bar.check()?;
        }
        for pair in bars.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(ChanError::NonMonotonicTimestamp {
                    index: pair[1].index,
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn highs(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|x| x.high).collect()
}

pub(crate) fn lows(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|x| x.low).collect()
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|x| x.close).collect()
}
