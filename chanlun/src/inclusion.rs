//! 包含关系处理（Inclusion Resolver）。
//!
//! 单次自左向右扫描：相邻两根 K 线若一方区间完全包含另一方，
//! 则把被包含一方的高低点扩展到包含方的极值。K 线本身不删除，
//! 只生成供分型识别使用的平滑高低点序列。
//!
//! 三根以上的嵌套包含在一次扫描中不一定完全消解，这是保留的兼容行为。

use serde::Serialize;

use crate::bar::{self, Bar};
use crate::utils::approx_eq_f64;

/// 处理包含关系后的高低点序列，与原始 K 线一一对应。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmoothedSeries {
    pub high: Vec<f64>,
    pub low: Vec<f64>,
}

impl SmoothedSeries {
    pub fn from_bars(bars: &[Bar]) -> Self {
        resolve_inclusion(&bar::highs(bars), &bar::lows(bars))
    }

    pub fn len(&self) -> usize {
        self.high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty()
    }

    /// 第一对仍存在包含关系、且区间未被合并为相同高低点的相邻位置 `(i - 1, i)`。
    pub fn first_nested_pair(&self) -> Option<(usize, usize)> {
        (1..self.len()).find_map(|i| {
            let fused = approx_eq_f64(self.high[i - 1], self.high[i])
                && approx_eq_f64(self.low[i - 1], self.low[i]);
            let nested =
                is_inclusive(self.high[i - 1], self.low[i - 1], self.high[i], self.low[i]);
            (nested && !fused).then_some((i - 1, i))
        })
    }
}

pub fn resolve_inclusion(high: &[f64], low: &[f64]) -> SmoothedSeries {
    let len = high.len().min(low.len());
    let mut h = high[..len].to_vec();
    let mut l = low[..len].to_vec();

    for i in 1..len {
        if h[i - 1] >= h[i] && l[i - 1] <= l[i] {
            // 前一根包含当前
            h[i] = h[i].max(h[i - 1]);
            l[i] = l[i].min(l[i - 1]);
        } else if h[i] >= h[i - 1] && l[i] <= l[i - 1] {
            // 当前包含前一根
            h[i - 1] = h[i].max(h[i - 1]);
            l[i - 1] = l[i].min(l[i - 1]);
        }
    }

    SmoothedSeries { high: h, low: l }
}

pub fn is_inclusive(a_high: f64, a_low: f64, b_high: f64, b_low: f64) -> bool {
    (a_high >= b_high && a_low <= b_low) || (a_high <= b_high && a_low >= b_low)
}
