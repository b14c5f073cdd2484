use std::fs;
use std::path::{Path, PathBuf};

use chanlun::{
    AnalysisSummary, Bar, ChanAnalyzer, ChanProfileConfig, Divergence, Fractal, Level, Segment, Stroke,
    ZhongShu, export_parquet, init_logging, load_bars,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct ExportPayload {
    symbol: String,
    level: Level,
    candles: Vec<CandlePoint>,
    fractals: Vec<Fractal>,
    strokes: Vec<AnchoredStroke>,
    segments: Vec<Segment>,
    zhongshus: Vec<ZoneRange>,
    divergences: Vec<Divergence>,
    summary: AnalysisSummary,
}

#[derive(Debug, Serialize)]
struct CandlePoint {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    high_smooth: f64,
    low_smooth: f64,
    macd_hist: f64,
}

#[derive(Debug, Serialize)]
struct AnchoredStroke {
    t0: i64,
    t1: i64,
    v0: f64,
    v1: f64,
    #[serde(flatten)]
    stroke: Stroke,
}

#[derive(Debug, Serialize)]
struct ZoneRange {
    t0: i64,
    t1: i64,
    #[serde(flatten)]
    zone: ZhongShu,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "usage: cargo run -p annotator --bin export_chan_structures -- <csv_path> <symbol> [level:1m|5m|30m|1d|1w|all] [output_json|output_dir] [profile_yaml] [parquet_dir]"
        );
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let symbol = args[2].clone();
    let profile = match args.get(5) {
        Some(raw) => ChanProfileConfig::from_yaml_file(raw)?,
        None => ChanProfileConfig::default(),
    };
    let parquet_dir = args.get(6).map(PathBuf::from);

    let bars = load_bars(&csv_path)?;

    match args.get(3).map(|x| x.trim()).filter(|x| !x.eq_ignore_ascii_case("all")) {
        Some(raw) => {
            let level = Level::parse(raw)?;
            let output = match args.get(4) {
                Some(raw) => PathBuf::from(raw),
                None => default_output(Path::new(DEFAULT_OUTPUT_DIR), &symbol, level),
            };
            export_level(&bars, &symbol, level, &profile, &output, parquet_dir.as_deref())?;
        }
        None => {
            let output_dir = args
                .get(4)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
            for level in profile.levels_for(&symbol) {
                let output = default_output(&output_dir, &symbol, level);
                export_level(&bars, &symbol, level, &profile, &output, parquet_dir.as_deref())?;
            }
        }
    }

    Ok(())
}

const DEFAULT_OUTPUT_DIR: &str = "annotator/out";

fn default_output(dir: &Path, symbol: &str, level: Level) -> PathBuf {
    dir.join(format!(
        "chan-structures-{}-{}.json",
        symbol.to_ascii_lowercase(),
        level.as_str()
    ))
}

fn export_level(
    bars: &[Bar],
    symbol: &str,
    level: Level,
    profile: &ChanProfileConfig,
    output: &Path,
    parquet_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = profile.resolve_for(symbol, level);
    let result = ChanAnalyzer::new(config).analyze(bars)?;

    let time_of = |index: usize| bars.get(index).map(|x| x.timestamp.timestamp());

    let candles = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| CandlePoint {
            time: bar.timestamp.timestamp(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            high_smooth: result.smoothed.high[i],
            low_smooth: result.smoothed.low[i],
            macd_hist: result.macd.hist[i],
        })
        .collect::<Vec<_>>();

    let strokes = result
        .strokes
        .iter()
        .filter_map(|stroke| {
            Some(AnchoredStroke {
                t0: time_of(stroke.start_index)?,
                t1: time_of(stroke.end_index)?,
                v0: stroke.start_price,
                v1: stroke.end_price,
                stroke: stroke.clone(),
            })
        })
        .collect::<Vec<_>>();

    let zhongshus = result
        .zhongshus
        .iter()
        .filter_map(|zone| {
            Some(ZoneRange {
                t0: time_of(zone.start_index)?,
                t1: time_of(zone.end_index)?,
                zone: zone.clone(),
            })
        })
        .collect::<Vec<_>>();

    if let Some(dir) = parquet_dir {
        let tag = format!("{}_{}", symbol.to_ascii_lowercase(), level.as_str());
        export_parquet(bars, &result, dir, &tag)?;
        info!(dir = %dir.display(), level = level.as_str(), "parquet frames written");
    }

    let payload = ExportPayload {
        symbol: symbol.to_string(),
        level,
        candles,
        fractals: result.fractals.clone(),
        strokes,
        segments: result.segments.clone(),
        zhongshus,
        divergences: result.divergences.clone(),
        summary: result.summary(),
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, serde_json::to_vec_pretty(&payload)?)?;

    println!(
        "exported {} bars at {} to {} (fractal={}, stroke={}, segment={}, zhongshu={}, divergence={})",
        payload.candles.len(),
        level.as_str(),
        output.display(),
        payload.fractals.len(),
        payload.strokes.len(),
        payload.segments.len(),
        payload.zhongshus.len(),
        payload.divergences.len(),
    );

    Ok(())
}
