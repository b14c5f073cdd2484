//! 中枢识别（ZhongShu Detector）。
//!
//! 以最少笔数为窗口逐笔滑动，窗口内各笔价格区间的交集即候选中枢；
//! 随后把时间相邻且价格重叠的候选合并，合并后的区间取交集（只收紧不放宽）。

use serde::Serialize;

use crate::config::ChanConfig;
use crate::stroke::Stroke;
use crate::utils::safe_ratio;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZhongShu {
    pub start_index: usize,
    pub end_index: usize,
    pub upper: f64,
    pub lower: f64,
    pub strokes: Vec<Stroke>,
    pub strength: f64,
}

impl ZhongShu {
    pub fn price_overlaps(&self, other: &ZhongShu) -> bool {
        self.upper.min(other.upper) > self.lower.max(other.lower)
    }

    fn merge(&mut self, other: ZhongShu) {
        self.start_index = self.start_index.min(other.start_index);
        self.end_index = self.end_index.max(other.end_index);
        self.upper = self.upper.min(other.upper);
        self.lower = self.lower.max(other.lower);
        self.strength = self.strength.max(other.strength);
        // 相邻窗口共享笔，按起点去重
        for stroke in other.strokes {
            if !self
                .strokes
                .iter()
                .any(|x| x.start_index == stroke.start_index && x.end_index == stroke.end_index)
            {
                self.strokes.push(stroke);
            }
        }
    }
}

/// 一组笔价格区间的几何交集 `(upper, lower)`。
pub fn overlap_bounds(strokes: &[Stroke]) -> Option<(f64, f64)> {
    if strokes.is_empty() {
        return None;
    }
    let upper = strokes.iter().map(Stroke::high).fold(f64::INFINITY, f64::min);
    let lower = strokes.iter().map(Stroke::low).fold(f64::NEG_INFINITY, f64::max);
    Some((upper, lower))
}

pub fn find_candidates(strokes: &[Stroke], config: &ChanConfig) -> Vec<ZhongShu> {
    let size = config.min_zhongshu_strokes.max(1);
    if strokes.len() < size {
        return Vec::new();
    }

    strokes
        .windows(size)
        .filter_map(|group| {
            let (upper, lower) = overlap_bounds(group)?;
            if upper <= lower {
                return None;
            }
            let strength = safe_ratio(upper - lower, lower)
                .filter(|_| lower > 0.0)
                .unwrap_or(0.0);
            if config.zhongshu_overlap_threshold > 0.0 && strength < config.zhongshu_overlap_threshold
            {
                return None;
            }
            Some(ZhongShu {
                start_index: group[0].start_index,
                end_index: group[group.len() - 1].end_index,
                upper,
                lower,
                strokes: group.to_vec(),
                strength,
            })
        })
        .collect()
}

pub fn merge_candidates(candidates: Vec<ZhongShu>, merge_gap: usize) -> Vec<ZhongShu> {
    let mut merged: Vec<ZhongShu> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match merged.last_mut() {
            Some(last)
                if candidate.start_index <= last.end_index.saturating_add(merge_gap)
                    && candidate.price_overlaps(last) =>
            {
                last.merge(candidate);
            }
            _ => merged.push(candidate),
        }
    }
    merged
}

pub fn detect_zhongshus(strokes: &[Stroke], config: &ChanConfig) -> Vec<ZhongShu> {
    merge_candidates(find_candidates(strokes, config), config.zhongshu_merge_gap)
}
