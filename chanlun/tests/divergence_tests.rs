use chanlun::{
    ChanConfig, Direction, DivergenceKind, Macd, Stroke, detect_divergences,
};

fn stroke(start: usize, end: usize, start_price: f64, end_price: f64) -> Stroke {
    Stroke {
        start_index: start,
        end_index: end,
        start_price,
        end_price,
        direction: if end_price > start_price {
            Direction::Up
        } else {
            Direction::Down
        },
        swing: (end_price - start_price).abs(),
        strength: 0.05,
    }
}

fn series_with(len: usize, base: f64, points: &[(usize, f64)]) -> Vec<f64> {
    let mut out = vec![base; len];
    for (index, value) in points {
        out[*index] = *value;
    }
    out
}

#[test]
fn higher_close_with_weaker_histogram_is_bearish() {
    let strokes = vec![
        stroke(5, 10, 100.0, 110.0),
        stroke(10, 15, 110.0, 100.0),
        stroke(15, 20, 100.0, 115.0),
    ];
    let closes = series_with(21, 100.0, &[(10, 110.0), (15, 100.0), (20, 115.0)]);
    let hist = series_with(21, 0.0, &[(10, 2.0), (15, 0.5), (20, 1.0)]);

    let divergences = detect_divergences(&closes, &strokes, &hist, &ChanConfig::default());
    assert_eq!(divergences.len(), 1, "divergences={divergences:?}");

    let div = &divergences[0];
    assert_eq!(div.kind, DivergenceKind::Bearish);
    assert_eq!(div.index, 20);
    assert_eq!(div.price, 115.0);
    assert_eq!(div.oscillator, 1.0);
    assert!((div.strength - 0.5).abs() < 1e-12);
}

#[test]
fn lower_close_with_stronger_histogram_is_bullish() {
    let strokes = vec![
        stroke(5, 10, 110.0, 100.0),
        stroke(10, 15, 100.0, 108.0),
        stroke(15, 20, 108.0, 95.0),
    ];
    let closes = series_with(21, 100.0, &[(10, 100.0), (15, 108.0), (20, 95.0)]);
    let hist = series_with(21, 0.0, &[(10, -2.0), (15, -0.5), (20, -1.0)]);

    let divergences = detect_divergences(&closes, &strokes, &hist, &ChanConfig::default());
    assert_eq!(divergences.len(), 1, "divergences={divergences:?}");
    assert_eq!(divergences[0].kind, DivergenceKind::Bullish);
    assert_eq!(divergences[0].index, 20);
}

#[test]
fn small_histogram_change_is_below_threshold() {
    let strokes = vec![
        stroke(5, 10, 100.0, 110.0),
        stroke(10, 15, 110.0, 100.0),
        stroke(15, 20, 100.0, 115.0),
    ];
    let closes = series_with(21, 100.0, &[(10, 110.0), (15, 100.0), (20, 115.0)]);
    let hist = series_with(21, 0.0, &[(10, 2.0), (15, 0.5), (20, 1.9999)]);

    let config = ChanConfig {
        divergence_threshold: 0.01,
        ..ChanConfig::default()
    };
    assert!(detect_divergences(&closes, &strokes, &hist, &config).is_empty());
}

#[test]
fn each_prior_in_window_is_compared_independently() {
    let strokes = vec![
        stroke(0, 5, 90.0, 105.0),
        stroke(5, 10, 105.0, 100.0),
        stroke(10, 15, 100.0, 110.0),
        stroke(15, 20, 110.0, 104.0),
        stroke(20, 25, 104.0, 120.0),
    ];
    let closes = series_with(
        26,
        100.0,
        &[(5, 105.0), (10, 100.0), (15, 110.0), (20, 104.0), (25, 120.0)],
    );
    let hist = series_with(
        26,
        0.0,
        &[(5, 3.0), (10, 0.2), (15, 2.0), (20, 0.4), (25, 1.0)],
    );

    let config = ChanConfig {
        divergence_lookback: 4,
        ..ChanConfig::default()
    };
    let divergences = detect_divergences(&closes, &strokes, &hist, &config);

    assert_eq!(divergences.len(), 2, "both earlier up strokes signal");
    assert!(divergences.iter().all(|x| x.index == 25));
    assert!(divergences.iter().all(|x| x.kind == DivergenceKind::Bearish));
}

#[test]
fn insufficient_strokes_or_zero_lookback_yield_nothing() {
    let strokes = vec![stroke(0, 5, 100.0, 110.0), stroke(5, 10, 110.0, 100.0)];
    let closes = vec![100.0; 11];
    let hist = vec![1.0; 11];

    assert!(detect_divergences(&closes, &strokes, &hist, &ChanConfig::default()).is_empty());

    let config = ChanConfig {
        divergence_lookback: 0,
        ..ChanConfig::default()
    };
    assert!(detect_divergences(&closes, &strokes, &hist, &config).is_empty());
}

#[test]
fn macd_histogram_is_aligned_and_flat_for_constant_prices() {
    let closes = vec![50.0; 40];
    let macd = Macd::compute(12, 26, 9, &closes);
    assert_eq!(macd.len(), closes.len());
    assert_eq!(macd.dif.len(), closes.len());
    assert!(macd.hist.iter().all(|x| x.abs() < 1e-12));

    let rising: Vec<f64> = (0..40).map(|x| 50.0 + x as f64).collect();
    let macd = Macd::compute(12, 26, 9, &rising);
    assert_eq!(macd.hist[0], 0.0, "series is seeded with the first close");
    assert!(macd.dif[39] > 0.0, "fast average leads on a rising series");
}
