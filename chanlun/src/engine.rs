//! 单次分析流水线。
//!
//! 校验 → 包含处理 → 分型 → 笔 → 线段 / 中枢 / 背驰。每个阶段完整消费上一阶段的输出，
//! 不保留任何跨调用状态，相同输入与配置总是得到相同结果。

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::bar::{self, Bar, BarNormalizer};
use crate::config::ChanConfig;
use crate::constant::{ChanError, Direction, DivergenceKind};
use crate::divergence::{detect_divergences, Divergence};
use crate::fractal::{detect_fractals, Fractal};
use crate::inclusion::SmoothedSeries;
use crate::indicator::{Macd, MacdSeries};
use crate::segment::{build_segments, Segment};
use crate::stroke::{build_strokes, Stroke};
use crate::zhongshu::{detect_zhongshus, ZhongShu};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub smoothed: SmoothedSeries,
    pub macd: MacdSeries,
    pub fractals: Vec<Fractal>,
    pub strokes: Vec<Stroke>,
    pub segments: Vec<Segment>,
    pub zhongshus: Vec<ZhongShu>,
    pub divergences: Vec<Divergence>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub bars: usize,
    pub fractals: usize,
    pub strokes: usize,
    pub segments: usize,
    pub zhongshus: usize,
    pub bull_divergences: usize,
    pub bear_divergences: usize,
    pub latest_stroke_direction: Option<Direction>,
    pub latest_divergence: Option<Divergence>,
    pub latest_zhongshu: Option<(f64, f64)>,
}

impl AnalysisResult {
    pub fn summary(&self) -> AnalysisSummary {
        let count_kind = |kind: DivergenceKind| {
            self.divergences.iter().filter(|x| x.kind == kind).count()
        };
        AnalysisSummary {
            bars: self.smoothed.len(),
            fractals: self.fractals.len(),
            strokes: self.strokes.len(),
            segments: self.segments.len(),
            zhongshus: self.zhongshus.len(),
            bull_divergences: count_kind(DivergenceKind::Bullish),
            bear_divergences: count_kind(DivergenceKind::Bearish),
            latest_stroke_direction: self.strokes.last().map(|x| x.direction),
            latest_divergence: self.divergences.last().cloned(),
            latest_zhongshu: self.zhongshus.last().map(|x| (x.lower, x.upper)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChanAnalyzer {
    config: ChanConfig,
}

impl ChanAnalyzer {
    pub fn new(config: ChanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChanConfig {
        &self.config
    }

    /// 对已排序的 K 线序列执行完整流水线；输入不合法时在任何阶段运行前返回错误。
    pub fn analyze(&self, bars: &[Bar]) -> Result<AnalysisResult, ChanError> {
        let span = info_span!("chan_analysis", bars = bars.len());
        let _guard = span.enter();

        self.config.validate()?;
        BarNormalizer::validate(bars)?;
        let config = &self.config;

        let smoothed = SmoothedSeries::from_bars(bars);
        debug!(bars = smoothed.len(), "inclusion resolved");

        let fractals = detect_fractals(&smoothed, config.fractal_window, config.min_fractal_gap);
        debug!(count = fractals.len(), "fractals detected");

        let closes = bar::closes(bars);
        let strokes = build_strokes(&fractals, &closes, config);

        let segments = build_segments(&strokes, config.min_segment_strokes);
        debug!(count = segments.len(), "segments aggregated");

        let zhongshus = detect_zhongshus(&strokes, config);
        debug!(count = zhongshus.len(), "zhongshu detected");

        let macd = Macd::compute(config.macd_fast, config.macd_slow, config.macd_signal, &closes);
        let divergences = detect_divergences(&closes, &strokes, &macd.hist, config);
        debug!(count = divergences.len(), "divergences detected");

        info!(
            fractals = fractals.len(),
            strokes = strokes.len(),
            segments = segments.len(),
            zhongshus = zhongshus.len(),
            divergences = divergences.len(),
            "chan analysis done"
        );

        Ok(AnalysisResult {
            smoothed,
            macd,
            fractals,
            strokes,
            segments,
            zhongshus,
            divergences,
        })
    }
}

pub fn analyze(bars: &[Bar], config: &ChanConfig) -> Result<AnalysisResult, ChanError> {
    ChanAnalyzer::new(config.clone()).analyze(bars)
}
