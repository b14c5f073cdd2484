//! 线段聚合（Segment Aggregator）。
//!
//! 连续同向的笔放入缓冲区；方向翻转时，缓冲区笔数达到
//! `max(2, min_segment_strokes - 1)` 即输出一条线段，然后以翻转的笔开始新缓冲区。
//! 收盘阈值比名义最少笔数少一，这是保留的既有行为。

use serde::Serialize;

use crate::constant::Direction;
use crate::stroke::Stroke;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub start_index: usize,
    pub end_index: usize,
    pub high: f64,
    pub low: f64,
    pub direction: Direction,
    pub strokes: Vec<Stroke>,
}

impl Segment {
    fn from_strokes(strokes: Vec<Stroke>) -> Option<Self> {
        let first = strokes.first()?;
        let last = strokes.last()?;
        let high = strokes.iter().map(Stroke::high).fold(f64::NEG_INFINITY, f64::max);
        let low = strokes.iter().map(Stroke::low).fold(f64::INFINITY, f64::min);
        Some(Self {
            start_index: first.start_index,
            end_index: last.end_index,
            high,
            low,
            direction: first.direction,
            strokes,
        })
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }
}

/// 线段收盘所需的最少笔数。
pub fn closing_threshold(min_segment_strokes: usize) -> usize {
    min_segment_strokes.saturating_sub(1).max(2)
}

pub fn build_segments(strokes: &[Stroke], min_segment_strokes: usize) -> Vec<Segment> {
    let threshold = closing_threshold(min_segment_strokes);
    let mut segments = Vec::new();
    let mut buffer: Vec<Stroke> = Vec::new();

    for stroke in strokes {
        let same_direction = buffer
            .last()
            .map(|x| x.direction == stroke.direction)
            .unwrap_or(true);
        if !same_direction {
            let closed = std::mem::take(&mut buffer);
            if closed.len() >= threshold {
                segments.extend(Segment::from_strokes(closed));
            }
        }
        buffer.push(stroke.clone());
    }

    if buffer.len() >= threshold {
        segments.extend(Segment::from_strokes(buffer));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::closing_threshold;

    #[test]
    fn closing_threshold_is_one_below_nominal_with_floor_two() {
        assert_eq!(closing_threshold(3), 2);
        assert_eq!(closing_threshold(5), 4);
        assert_eq!(closing_threshold(2), 2);
        assert_eq!(closing_threshold(0), 2);
    }
}
