use chrono::{Duration, TimeZone, Utc};

use chanlun::{
    AnalysisRequest, Bar, ChanAnalyzer, ChanConfig, ChanError, DivergenceKind, analyze,
    analyze_batch, bars_frame, export_parquet,
};

fn sample_bars(count: usize) -> Vec<Bar> {
    let base_dt = Utc
        .with_ymd_and_hms(2024, 1, 2, 9, 30, 0)
        .single()
        .expect("valid dt");

    let mut price: f64 = 100.0;
    let cycle = [0.0_f64, 2.8, -2.4, 3.7, -3.1, 2.2, -1.6, 3.4, -2.9, 1.8];
    let mut bars = Vec::with_capacity(count);
    for i in 0..count {
        let open = price;
        let wave = 6.0 * ((i as f64) * std::f64::consts::TAU / 36.0).sin();
        let close = (100.0 + wave + cycle[i % cycle.len()] * 0.4 + (i as f64) * 0.02).max(1.0);
        let high = open.max(close) + 0.6;
        let low = open.min(close) - 0.6;
        price = close;

        bars.push(Bar {
            index: i,
            timestamp: base_dt + Duration::minutes((i as i64) * 30),
            open,
            high,
            low,
            close,
            volume: Some(1000 + i as u64),
        });
    }
    bars
}

#[test]
fn analysis_is_deterministic() {
    let bars = sample_bars(240);
    let config = ChanConfig::default();

    let first = analyze(&bars, &config).expect("valid input");
    let second = analyze(&bars, &config).expect("valid input");

    assert_eq!(first, second);
    let first_json = serde_json::to_vec(&first).expect("serializable");
    let second_json = serde_json::to_vec(&second).expect("serializable");
    assert_eq!(first_json, second_json, "serialized output should be byte identical");
}

#[test]
fn structures_respect_ordering_invariants() {
    let bars = sample_bars(240);
    let result = analyze(&bars, &ChanConfig::default()).expect("valid input");

    assert_eq!(result.smoothed.len(), bars.len());
    assert_eq!(result.macd.len(), bars.len());
    assert!(!result.fractals.is_empty(), "a wave series should produce fractals");
    assert!(!result.strokes.is_empty(), "a wave series should produce strokes");

    for pair in result.fractals.windows(2) {
        assert!(pair[0].index <= pair[1].index, "fractals are ordered by index");
    }
    for fractal in &result.fractals {
        assert!(fractal.index > 0 && fractal.index + 1 < bars.len());
    }
    for stroke in &result.strokes {
        assert!(stroke.start_index < stroke.end_index);
        assert!(stroke.end_index - stroke.start_index >= 3);
    }
    for pair in result.strokes.windows(2) {
        assert!(pair[0].start_index < pair[1].start_index);
    }
    for segment in &result.segments {
        assert!(segment.start_index <= segment.end_index);
        assert!(segment.low <= segment.high);
    }
    for pair in result.segments.windows(2) {
        assert!(
            pair[0].start_index < pair[1].start_index,
            "segments are ordered by start index"
        );
        assert!(pair[0].end_index <= pair[1].start_index, "segments do not overlap in time");
    }
    for pair in result.zhongshus.windows(2) {
        assert!(
            pair[0].start_index < pair[1].start_index,
            "zhongshu are ordered by start index"
        );
    }
    for pair in result.divergences.windows(2) {
        assert!(pair[0].index <= pair[1].index, "divergences are ordered by index");
    }
    for zone in &result.zhongshus {
        assert!(zone.lower < zone.upper);
        for member in &zone.strokes {
            assert!(member.low() <= zone.upper && member.high() >= zone.lower);
        }
    }
    for divergence in &result.divergences {
        assert!(divergence.index < bars.len());
        assert!(divergence.strength > ChanConfig::default().divergence_threshold);
    }
}

#[test]
fn insufficient_data_yields_empty_collections() {
    let config = ChanConfig::default();

    let empty = analyze(&[], &config).expect("empty input is valid");
    assert!(empty.smoothed.is_empty());
    assert!(empty.fractals.is_empty() && empty.strokes.is_empty());
    assert!(empty.segments.is_empty() && empty.zhongshus.is_empty());
    assert!(empty.divergences.is_empty());

    let short = analyze(&sample_bars(2), &config).expect("short input is valid");
    assert_eq!(short.smoothed.len(), 2);
    assert!(short.fractals.is_empty());
    assert!(short.strokes.is_empty());
}

#[test]
fn invalid_input_is_rejected_before_analysis() {
    let mut bars = sample_bars(30);
    bars[10].high = bars[10].low - 1.0;
    assert!(matches!(
        analyze(&bars, &ChanConfig::default()),
        Err(ChanError::InvalidBar { index: 10, .. })
    ));

    let mut bars = sample_bars(30);
    bars[20].timestamp = bars[19].timestamp;
    assert!(matches!(
        analyze(&bars, &ChanConfig::default()),
        Err(ChanError::NonMonotonicTimestamp { index: 20 })
    ));

    let config = ChanConfig {
        macd_slow: 0,
        ..ChanConfig::default()
    };
    assert!(matches!(
        ChanAnalyzer::new(config).analyze(&sample_bars(30)),
        Err(ChanError::InvalidConfig(_))
    ));
}

#[test]
fn summary_counts_match_collections() {
    let bars = sample_bars(240);
    let result = analyze(&bars, &ChanConfig::default()).expect("valid input");
    let summary = result.summary();

    assert_eq!(summary.bars, bars.len());
    assert_eq!(summary.fractals, result.fractals.len());
    assert_eq!(summary.strokes, result.strokes.len());
    assert_eq!(summary.segments, result.segments.len());
    assert_eq!(summary.zhongshus, result.zhongshus.len());
    assert_eq!(
        summary.bull_divergences + summary.bear_divergences,
        result.divergences.len()
    );
    assert_eq!(
        summary.bear_divergences,
        result
            .divergences
            .iter()
            .filter(|x| x.kind == DivergenceKind::Bearish)
            .count()
    );
    assert_eq!(
        summary.latest_stroke_direction,
        result.strokes.last().map(|x| x.direction)
    );
}

#[test]
fn frames_have_one_row_per_entity() {
    let bars = sample_bars(240);
    let result = analyze(&bars, &ChanConfig::default()).expect("valid input");

    let frame = bars_frame(&bars, &result).expect("bars frame");
    assert_eq!(frame.height(), bars.len());
    assert_eq!(frame.width(), 10);

    assert_eq!(result.fractals_frame().expect("fractals").height(), result.fractals.len());
    assert_eq!(result.strokes_frame().expect("strokes").height(), result.strokes.len());
    assert_eq!(result.segments_frame().expect("segments").height(), result.segments.len());
    assert_eq!(result.zhongshus_frame().expect("zhongshus").height(), result.zhongshus.len());
    assert_eq!(
        result.divergences_frame().expect("divergences").height(),
        result.divergences.len()
    );
}

#[test]
fn parquet_export_writes_every_frame() {
    let bars = sample_bars(120);
    let result = analyze(&bars, &ChanConfig::default()).expect("valid input");
    let dir = std::env::temp_dir().join(format!("chanlun_parquet_{}", std::process::id()));

    export_parquet(&bars, &result, &dir, "sample_30m").expect("parquet export");
    for name in ["bars", "fractals", "strokes", "segments", "zhongshus", "divergences"] {
        let path = dir.join(format!("{name}_sample_30m.parquet"));
        assert!(path.exists(), "{} should be written", path.display());
    }
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn batch_results_follow_request_order_and_isolate_failures() {
    let good = sample_bars(180);
    let mut broken = sample_bars(60);
    broken[5].timestamp = broken[4].timestamp;

    let requests = vec![
        AnalysisRequest {
            key: "alpha.30m".to_string(),
            bars: good.clone(),
            config: ChanConfig::default(),
        },
        AnalysisRequest {
            key: "broken.30m".to_string(),
            bars: broken,
            config: ChanConfig::default(),
        },
        AnalysisRequest {
            key: "gamma.30m".to_string(),
            bars: good[..120].to_vec(),
            config: ChanConfig {
                min_stroke_pct: 0.01,
                ..ChanConfig::default()
            },
        },
    ];

    let outcomes = analyze_batch(requests, 2);
    let keys: Vec<&str> = outcomes.iter().map(|x| x.key.as_str()).collect();
    assert_eq!(keys, vec!["alpha.30m", "broken.30m", "gamma.30m"]);

    let alpha = outcomes[0].result.as_ref().expect("alpha is valid");
    assert_eq!(alpha, &analyze(&good, &ChanConfig::default()).expect("valid input"));

    assert!(matches!(
        outcomes[1].result,
        Err(ChanError::NonMonotonicTimestamp { index: 5 })
    ));
    assert!(outcomes[2].result.is_ok());

    assert!(analyze_batch(Vec::new(), 4).is_empty());
}
