use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    Top,
    Bottom,
}

impl FractalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DivergenceKind {
    #[serde(rename = "bull_div")]
    Bullish,
    #[serde(rename = "bear_div")]
    Bearish,
}

impl DivergenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bull_div",
            Self::Bearish => "bear_div",
        }
    }
}

/// 分析级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
}

impl Level {
    pub const ALL: [Level; 5] = [Self::M1, Self::M5, Self::M30, Self::D1, Self::W1];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M30 => "30m",
            Self::D1 => "1d",
            Self::W1 => "1w",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ChanError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "30m" => Ok(Self::M30),
            "1d" => Ok(Self::D1),
            "1w" | "1wk" => Ok(Self::W1),
            _ => Err(ChanError::InvalidLevel(value.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ChanError {
    MissingField { row: usize, field: &'static str },
    InvalidBar { index: usize, reason: String },
    NonMonotonicTimestamp { index: usize },
    InvalidDatetime(String),
    InvalidLevel(String),
    InvalidConfig(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Yaml(serde_yaml::Error),
    Polars(polars::error::PolarsError),
}

impl Display for ChanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { row, field } => {
                write!(f, "row {row}: missing required field `{field}`")
            }
            Self::InvalidBar { index, reason } => write!(f, "bar {index}: {reason}"),
            Self::NonMonotonicTimestamp { index } => {
                write!(f, "bar {index}: timestamp is not strictly ascending")
            }
            Self::InvalidDatetime(v) => write!(f, "invalid datetime: {v}"),
            Self::InvalidLevel(v) => write!(f, "invalid level: {v}"),
            Self::InvalidConfig(v) => write!(f, "invalid config: {v}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
        }
    }
}

impl std::error::Error for ChanError {}

impl From<std::io::Error> for ChanError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ChanError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_yaml::Error> for ChanError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<polars::error::PolarsError> for ChanError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}
