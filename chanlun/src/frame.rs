//! 分析结果的 dataframe 导出。
//!
//! 每类结构一张表，序号列均指向调用方传入的 K 线序列。

use std::fs::{create_dir_all, File};
use std::path::Path;

use polars::df;
use polars::prelude::{DataFrame, ParquetWriter};

use crate::bar::Bar;
use crate::constant::ChanError;
use crate::engine::AnalysisResult;

fn as_u64(values: impl Iterator<Item = usize>) -> Vec<u64> {
    values.map(|x| x as u64).collect()
}

pub fn bars_frame(bars: &[Bar], result: &AnalysisResult) -> Result<DataFrame, ChanError> {
    let index = as_u64(bars.iter().map(|x| x.index));
    let timestamp: Vec<i64> = bars.iter().map(|x| x.timestamp.timestamp_millis()).collect();
    let open: Vec<f64> = bars.iter().map(|x| x.open).collect();
    let high: Vec<f64> = bars.iter().map(|x| x.high).collect();
    let low: Vec<f64> = bars.iter().map(|x| x.low).collect();
    let close: Vec<f64> = bars.iter().map(|x| x.close).collect();
    let volume: Vec<Option<u64>> = bars.iter().map(|x| x.volume).collect();
    let high_smooth = result.smoothed.high.clone();
    let low_smooth = result.smoothed.low.clone();
    let macd_hist = result.macd.hist.clone();

    Ok(df!(
        "index" => index,
        "timestamp" => timestamp,
        "open" => open,
        "high" => high,
        "low" => low,
        "close" => close,
        "volume" => volume,
        "high_smooth" => high_smooth,
        "low_smooth" => low_smooth,
        "macd_hist" => macd_hist
    )?)
}

impl AnalysisResult {
    pub fn fractals_frame(&self) -> Result<DataFrame, ChanError> {
        let rows = &self.fractals;
        Ok(df!(
            "index" => as_u64(rows.iter().map(|x| x.index)),
            "kind" => rows.iter().map(|x| x.kind.as_str()).collect::<Vec<_>>(),
            "price" => rows.iter().map(|x| x.price).collect::<Vec<_>>(),
            "high" => rows.iter().map(|x| x.high).collect::<Vec<_>>(),
            "low" => rows.iter().map(|x| x.low).collect::<Vec<_>>(),
            "strength" => rows.iter().map(|x| x.strength).collect::<Vec<_>>(),
            "confirmed" => rows.iter().map(|x| x.confirmed).collect::<Vec<_>>()
        )?)
    }

    pub fn strokes_frame(&self) -> Result<DataFrame, ChanError> {
        let rows = &self.strokes;
        Ok(df!(
            "start_index" => as_u64(rows.iter().map(|x| x.start_index)),
            "end_index" => as_u64(rows.iter().map(|x| x.end_index)),
            "start_price" => rows.iter().map(|x| x.start_price).collect::<Vec<_>>(),
            "end_price" => rows.iter().map(|x| x.end_price).collect::<Vec<_>>(),
            "direction" => rows.iter().map(|x| x.direction.as_str()).collect::<Vec<_>>(),
            "swing" => rows.iter().map(|x| x.swing).collect::<Vec<_>>(),
            "strength" => rows.iter().map(|x| x.strength).collect::<Vec<_>>()
        )?)
    }

    pub fn segments_frame(&self) -> Result<DataFrame, ChanError> {
        let rows = &self.segments;
        Ok(df!(
            "start_index" => as_u64(rows.iter().map(|x| x.start_index)),
            "end_index" => as_u64(rows.iter().map(|x| x.end_index)),
            "high" => rows.iter().map(|x| x.high).collect::<Vec<_>>(),
            "low" => rows.iter().map(|x| x.low).collect::<Vec<_>>(),
            "direction" => rows.iter().map(|x| x.direction.as_str()).collect::<Vec<_>>(),
            "stroke_count" => as_u64(rows.iter().map(|x| x.stroke_count()))
        )?)
    }

    pub fn zhongshus_frame(&self) -> Result<DataFrame, ChanError> {
        let rows = &self.zhongshus;
        Ok(df!(
            "start_index" => as_u64(rows.iter().map(|x| x.start_index)),
            "end_index" => as_u64(rows.iter().map(|x| x.end_index)),
            "upper" => rows.iter().map(|x| x.upper).collect::<Vec<_>>(),
            "lower" => rows.iter().map(|x| x.lower).collect::<Vec<_>>(),
            "stroke_count" => as_u64(rows.iter().map(|x| x.strokes.len())),
            "strength" => rows.iter().map(|x| x.strength).collect::<Vec<_>>()
        )?)
    }

    pub fn divergences_frame(&self) -> Result<DataFrame, ChanError> {
        let rows = &self.divergences;
        Ok(df!(
            "index" => as_u64(rows.iter().map(|x| x.index)),
            "kind" => rows.iter().map(|x| x.kind.as_str()).collect::<Vec<_>>(),
            "price" => rows.iter().map(|x| x.price).collect::<Vec<_>>(),
            "oscillator" => rows.iter().map(|x| x.oscillator).collect::<Vec<_>>(),
            "strength" => rows.iter().map(|x| x.strength).collect::<Vec<_>>()
        )?)
    }
}

/// 以 `{name}_{tag}.parquet` 写出全部结构表。
pub fn export_parquet(
    bars: &[Bar],
    result: &AnalysisResult,
    output_dir: impl AsRef<Path>,
    tag: &str,
) -> Result<(), ChanError> {
    let output_dir = output_dir.as_ref();
    create_dir_all(output_dir)?;

    let frames = [
        ("bars", bars_frame(bars, result)?),
        ("fractals", result.fractals_frame()?),
        ("strokes", result.strokes_frame()?),
        ("segments", result.segments_frame()?),
        ("zhongshus", result.zhongshus_frame()?),
        ("divergences", result.divergences_frame()?),
    ];
    for (name, mut frame) in frames {
        let mut file = File::create(output_dir.join(format!("{name}_{tag}.parquet")))?;
        ParquetWriter::new(&mut file).finish(&mut frame)?;
    }
    Ok(())
}
