//! 分析参数配置。
//!
//! `ChanConfig` 的默认值即标准参数；YAML 中只需写出需要覆盖的字段（patch），
//! 也可以按 symbol / level 维度组织成 profile，解析时逐层叠加。

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::{ChanError, Level};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChanConfig {
    pub fractal_window: usize,
    pub min_fractal_gap: usize,

    pub min_stroke_bars: usize,
    pub min_stroke_pct: f64,
    pub reference_window: usize,
    pub reference_min_bars: usize,

    pub min_segment_strokes: usize,

    pub min_zhongshu_strokes: usize,
    pub zhongshu_merge_gap: usize,
    pub zhongshu_overlap_threshold: f64,

    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,

    pub divergence_lookback: usize,
    pub divergence_threshold: f64,

    pub levels: Vec<Level>,
}

impl Default for ChanConfig {
    fn default() -> Self {
        Self {
            fractal_window: 3,
            min_fractal_gap: 2,

            min_stroke_bars: 3,
            min_stroke_pct: 0.002,
            reference_window: 200,
            reference_min_bars: 10,

            min_segment_strokes: 3,

            min_zhongshu_strokes: 3,
            zhongshu_merge_gap: 5,
            zhongshu_overlap_threshold: 0.0,

            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,

            divergence_lookback: 2,
            divergence_threshold: 0.001,

            levels: Level::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChanConfigPatch {
    pub fractal_window: Option<usize>,
    pub min_fractal_gap: Option<usize>,

    pub min_stroke_bars: Option<usize>,
    pub min_stroke_pct: Option<f64>,
    pub reference_window: Option<usize>,
    pub reference_min_bars: Option<usize>,

    pub min_segment_strokes: Option<usize>,

    pub min_zhongshu_strokes: Option<usize>,
    pub zhongshu_merge_gap: Option<usize>,
    pub zhongshu_overlap_threshold: Option<f64>,

    pub macd_fast: Option<usize>,
    pub macd_slow: Option<usize>,
    pub macd_signal: Option<usize>,

    pub divergence_lookback: Option<usize>,
    pub divergence_threshold: Option<f64>,

    pub levels: Option<Vec<Level>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChanProfileConfig {
    #[serde(default)]
    pub default: ChanConfigPatch,
    #[serde(default)]
    pub level: HashMap<String, ChanConfigPatch>,
    #[serde(default)]
    pub symbol: HashMap<String, ChanConfigPatch>,
    #[serde(default)]
    pub symbol_level: HashMap<String, ChanConfigPatch>,
}

impl ChanConfig {
    pub fn apply_patch(mut self, patch: ChanConfigPatch) -> Self {
        if let Some(v) = patch.fractal_window {
            self.fractal_window = v;
        }
        if let Some(v) = patch.min_fractal_gap {
            self.min_fractal_gap = v;
        }

        if let Some(v) = patch.min_stroke_bars {
            self.min_stroke_bars = v;
        }
        if let Some(v) = patch.min_stroke_pct {
            self.min_stroke_pct = v;
        }
        if let Some(v) = patch.reference_window {
            self.reference_window = v;
        }
        if let Some(v) = patch.reference_min_bars {
            self.reference_min_bars = v;
        }

        if let Some(v) = patch.min_segment_strokes {
            self.min_segment_strokes = v;
        }

        if let Some(v) = patch.min_zhongshu_strokes {
            self.min_zhongshu_strokes = v;
        }
        if let Some(v) = patch.zhongshu_merge_gap {
            self.zhongshu_merge_gap = v;
        }
        if let Some(v) = patch.zhongshu_overlap_threshold {
            self.zhongshu_overlap_threshold = v;
        }

        if let Some(v) = patch.macd_fast {
            self.macd_fast = v;
        }
        if let Some(v) = patch.macd_slow {
            self.macd_slow = v;
        }
        if let Some(v) = patch.macd_signal {
            self.macd_signal = v;
        }

        if let Some(v) = patch.divergence_lookback {
            self.divergence_lookback = v;
        }
        if let Some(v) = patch.divergence_threshold {
            self.divergence_threshold = v;
        }
        if let Some(v) = patch.levels {
            self.levels = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ChanError> {
        let invalid = |msg: String| Err(ChanError::InvalidConfig(msg));
        if self.fractal_window < 3 {
            return invalid(format!("fractal_window must be >= 3, got {}", self.fractal_window));
        }
        if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
            return invalid("macd periods must be > 0".to_string());
        }
        if self.macd_fast >= self.macd_slow {
            return invalid(format!(
                "macd_fast ({}) must be below macd_slow ({})",
                self.macd_fast, self.macd_slow
            ));
        }
        if self.reference_window == 0 {
            return invalid("reference_window must be > 0".to_string());
        }
        let thresholds = [
            ("min_stroke_pct", self.min_stroke_pct),
            ("zhongshu_overlap_threshold", self.zhongshu_overlap_threshold),
            ("divergence_threshold", self.divergence_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ChanError> {
        let patch: ChanConfigPatch = serde_yaml::from_str(yaml)?;
        let config = Self::default().apply_patch(patch);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ChanError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}

impl ChanProfileConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ChanError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ChanError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// 某个 symbol 需要分析的级别列表，只叠加与级别无关的层：default < symbol < `symbol.*`。
    pub fn levels_for(&self, symbol: &str) -> Vec<Level> {
        let symbol_norm = normalize_key(symbol);
        let mut config = ChanConfig::default().apply_patch(self.default.clone());
        if let Some(patch) = find_patch(&self.symbol, &symbol_norm) {
            config = config.apply_patch(patch.clone());
        }
        if let Some(patch) = find_patch(&self.symbol_level, &format!("{symbol_norm}.*")) {
            config = config.apply_patch(patch.clone());
        }
        config.levels
    }

    /// 叠加顺序：default < level < symbol < `*.level` < `symbol.*` < `symbol.level`。
    pub fn resolve_for(&self, symbol: &str, level: Level) -> ChanConfig {
        let symbol_norm = normalize_key(symbol);
        let level_norm = level.as_str().to_string();
        let symbol_level = format!("{symbol_norm}.{level_norm}");
        let symbol_wild = format!("{symbol_norm}.*");
        let level_wild = format!("*.{level_norm}");

        let mut config = ChanConfig::default().apply_patch(self.default.clone());

        if let Some(patch) = find_patch(&self.level, &level_norm) {
            config = config.apply_patch(patch.clone());
        }
        if let Some(patch) = find_patch(&self.symbol, &symbol_norm) {
            config = config.apply_patch(patch.clone());
        }
        if let Some(patch) = find_patch(&self.symbol_level, &level_wild) {
            config = config.apply_patch(patch.clone());
        }
        if let Some(patch) = find_patch(&self.symbol_level, &symbol_wild) {
            config = config.apply_patch(patch.clone());
        }
        if let Some(patch) = find_patch(&self.symbol_level, &symbol_level) {
            config = config.apply_patch(patch.clone());
        }

        config
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

fn find_patch<'a>(
    map: &'a HashMap<String, ChanConfigPatch>,
    key: &str,
) -> Option<&'a ChanConfigPatch> {
    let key_norm = normalize_key(key);
    map.iter()
        .find(|(k, _)| normalize_key(k) == key_norm)
        .map(|(_, v)| v)
}
