//! 背驰识别（Divergence Detector）。
//!
//! 在笔的终点比较收盘价与 MACD 柱：价格创新高而柱值走弱为顶背驰，
//! 价格创新低而柱值走强为底背驰。每支笔与回看窗口内的每支前笔独立比较。

use serde::Serialize;

use crate::config::ChanConfig;
use crate::constant::{DivergenceKind, Direction};
use crate::stroke::Stroke;
use crate::utils::safe_ratio;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divergence {
    pub index: usize,
    pub kind: DivergenceKind,
    pub price: f64,
    pub oscillator: f64,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    close: f64,
    hist: f64,
}

fn endpoint(closes: &[f64], hist: &[f64], stroke: &Stroke) -> Option<Endpoint> {
    Some(Endpoint {
        close: *closes.get(stroke.end_index)?,
        hist: *hist.get(stroke.end_index)?,
    })
}

fn classify(
    direction: Direction,
    current: Endpoint,
    prior: Endpoint,
    threshold: f64,
) -> Option<(DivergenceKind, f64)> {
    let kind = match direction {
        Direction::Up if current.close > prior.close && current.hist < prior.hist => {
            DivergenceKind::Bearish
        }
        Direction::Down if current.close < prior.close && current.hist > prior.hist => {
            DivergenceKind::Bullish
        }
        _ => return None,
    };
    // 前值为零时无法计算相对变化，视为无信号
    let strength = safe_ratio((current.hist - prior.hist).abs(), prior.hist.abs())?;
    (strength > threshold).then_some((kind, strength))
}

pub fn detect_divergences(
    closes: &[f64],
    strokes: &[Stroke],
    hist: &[f64],
    config: &ChanConfig,
) -> Vec<Divergence> {
    let lookback = config.divergence_lookback;
    let mut out = Vec::new();
    if lookback == 0 {
        return out;
    }

    for i in lookback..strokes.len() {
        let current_stroke = &strokes[i];
        let Some(current) = endpoint(closes, hist, current_stroke) else {
            continue;
        };

        for prior_stroke in &strokes[i - lookback..i] {
            let Some(prior) = endpoint(closes, hist, prior_stroke) else {
                continue;
            };
            if let Some((kind, strength)) = classify(
                current_stroke.direction,
                current,
                prior,
                config.divergence_threshold,
            ) {
                out.push(Divergence {
                    index: current_stroke.end_index,
                    kind,
                    price: current.close,
                    oscillator: current.hist,
                    strength,
                });
            }
        }
    }
    out
}
