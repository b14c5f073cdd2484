//! 分型识别（Fractal Detector）。

use serde::Serialize;

use crate::constant::FractalKind;
use crate::inclusion::SmoothedSeries;
use crate::utils::safe_ratio;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fractal {
    pub index: usize,
    pub kind: FractalKind,
    /// 顶分型取高点，底分型取低点。
    pub price: f64,
    pub high: f64,
    pub low: f64,
    pub strength: f64,
    pub confirmed: bool,
}

impl Fractal {
    /// `self` 是否比同类分型 `other` 更极端（顶更高，底更低）。
    pub fn more_extreme_than(&self, other: &Fractal) -> bool {
        match self.kind {
            FractalKind::Top => self.price > other.price,
            FractalKind::Bottom => self.price < other.price,
        }
    }
}

/// 边缘排除半径：`window` 为完整窗口宽度，前后各 `window / 2` 根 K 线不参与识别。
pub fn window_radius(window: usize) -> usize {
    (window / 2).max(1)
}

pub fn detect_fractals(series: &SmoothedSeries, window: usize, min_gap: usize) -> Vec<Fractal> {
    let raw = find_raw_fractals(&series.high, &series.low, window);
    filter_min_gap(raw, min_gap)
}

/// 按序号输出全部局部极值（只与左右相邻 K 线比较）；
/// 同一根 K 线可能同时是顶和底，两者都保留（顶在前）。
pub fn find_raw_fractals(high: &[f64], low: &[f64], window: usize) -> Vec<Fractal> {
    let len = high.len().min(low.len());
    let radius = window_radius(window);
    let mut out = Vec::new();
    if len < 2 * radius + 1 {
        return out;
    }

    for i in radius..(len - radius) {
        let neighbour_high = high[i - 1].max(high[i + 1]);
        if high[i] > neighbour_high {
            out.push(Fractal {
                index: i,
                kind: FractalKind::Top,
                price: high[i],
                high: high[i],
                low: low[i],
                strength: safe_ratio(high[i] - neighbour_high, high[i]).unwrap_or(0.0),
                confirmed: true,
            });
        }

        let neighbour_low = low[i - 1].min(low[i + 1]);
        if low[i] < neighbour_low {
            out.push(Fractal {
                index: i,
                kind: FractalKind::Bottom,
                price: low[i],
                high: high[i],
                low: low[i],
                strength: safe_ratio(neighbour_low - low[i], low[i]).unwrap_or(0.0),
                confirmed: true,
            });
        }
    }
    out
}

/// 与上一个保留分型（不论类型）距离不足 `min_gap` 时，只保留强度更大的一个。
pub fn filter_min_gap(raw: Vec<Fractal>, min_gap: usize) -> Vec<Fractal> {
    let mut kept: Vec<Fractal> = Vec::with_capacity(raw.len());
    for fractal in raw {
        match kept.last_mut() {
            Some(last) if fractal.index - last.index < min_gap => {
                if fractal.strength > last.strength {
                    *last = fractal;
                }
            }
            _ => kept.push(fractal),
        }
    }
    kept
}
