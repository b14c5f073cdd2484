//! 笔的构建（Stroke Builder）。
//!
//! 1. 分型交替：相邻同类分型只保留更极端者；
//! 2. 相邻顶底配对成笔，按最小跨度与最小振幅逐对过滤，不满足的配对直接丢弃。

use serde::Serialize;
use tracing::debug;

use crate::config::ChanConfig;
use crate::constant::Direction;
use crate::fractal::Fractal;
use crate::utils::{nan_mean, safe_ratio, tail};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub start_index: usize,
    pub end_index: usize,
    pub start_price: f64,
    pub end_price: f64,
    pub direction: Direction,
    /// 振幅绝对值。
    pub swing: f64,
    /// 振幅占参考价的比例。
    pub strength: f64,
}

impl Stroke {
    pub fn high(&self) -> f64 {
        self.start_price.max(self.end_price)
    }

    pub fn low(&self) -> f64 {
        self.start_price.min(self.end_price)
    }
}

/// 保证输出序列顶底严格交替。
pub fn enforce_alternation(fractals: &[Fractal]) -> Vec<Fractal> {
    let mut ordered: Vec<Fractal> = Vec::with_capacity(fractals.len());
    for fractal in fractals {
        match ordered.last_mut() {
            Some(last) if last.kind == fractal.kind => {
                if fractal.more_extreme_than(last) {
                    *last = fractal.clone();
                }
            }
            _ => ordered.push(fractal.clone()),
        }
    }
    ordered
}

/// 振幅归一化用的参考价：最近 `window` 根收盘价均值；
/// 不足 `min_bars` 根时取全部收盘价均值。
pub fn reference_price(closes: &[f64], window: usize, min_bars: usize) -> Option<f64> {
    if closes.len() >= min_bars {
        nan_mean(tail(closes, window))
    } else {
        nan_mean(closes)
    }
}

pub fn build_strokes(fractals: &[Fractal], closes: &[f64], config: &ChanConfig) -> Vec<Stroke> {
    let ordered = enforce_alternation(fractals);
    if ordered.len() < 2 {
        return Vec::new();
    }

    let Some(px_ref) = reference_price(closes, config.reference_window, config.reference_min_bars)
    else {
        return Vec::new();
    };

    let mut strokes = Vec::new();
    for pair in ordered.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let bars = b.index - a.index;
        let swing = (b.price - a.price).abs();
        let Some(swing_pct) = safe_ratio(swing, px_ref) else {
            continue;
        };
        if bars < config.min_stroke_bars || swing_pct < config.min_stroke_pct {
            continue;
        }

        strokes.push(Stroke {
            start_index: a.index,
            end_index: b.index,
            start_price: a.price,
            end_price: b.price,
            direction: if b.price > a.price {
                Direction::Up
            } else {
                Direction::Down
            },
            swing,
            strength: swing_pct,
        });
    }

    debug!(
        fractals = fractals.len(),
        alternating = ordered.len(),
        strokes = strokes.len(),
        reference = px_ref,
        "strokes built"
    );
    strokes
}
