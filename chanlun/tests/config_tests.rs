use chanlun::{ChanConfig, ChanError, ChanProfileConfig, Level};

#[test]
fn default_config_is_valid() {
    let config = ChanConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.fractal_window, 3);
    assert_eq!(config.min_stroke_bars, 3);
    assert_eq!((config.macd_fast, config.macd_slow, config.macd_signal), (12, 26, 9));
    assert_eq!(config.levels, Level::ALL.to_vec());
}

#[test]
fn yaml_patch_overrides_only_named_fields() {
    let yaml = r#"
min_stroke_pct: 0.01
zhongshu_merge_gap: 8
levels: ["1d", "1w"]
"#;
    let config = ChanConfig::from_yaml_str(yaml).expect("valid patch");

    assert!((config.min_stroke_pct - 0.01).abs() < 1e-12);
    assert_eq!(config.zhongshu_merge_gap, 8);
    assert_eq!(config.levels, vec![Level::D1, Level::W1]);
    assert_eq!(config.min_fractal_gap, ChanConfig::default().min_fractal_gap);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(matches!(
        ChanConfig::from_yaml_str("macd_fast: 0"),
        Err(ChanError::InvalidConfig(_))
    ));
    assert!(matches!(
        ChanConfig::from_yaml_str("macd_fast: 30"),
        Err(ChanError::InvalidConfig(_))
    ));
    assert!(matches!(
        ChanConfig::from_yaml_str("fractal_window: 2"),
        Err(ChanError::InvalidConfig(_))
    ));
    assert!(matches!(
        ChanConfig::from_yaml_str("divergence_threshold: -0.5"),
        Err(ChanError::InvalidConfig(_))
    ));
    assert!(matches!(
        ChanConfig::from_yaml_str("min_stroke_bars: [1, 2]"),
        Err(ChanError::Yaml(_))
    ));
}

#[test]
fn profile_layers_resolve_in_precedence_order() {
    let yaml = r#"
default:
  min_stroke_bars: 4
level:
  1d:
    min_stroke_bars: 5
    divergence_lookback: 3
symbol:
  AAPL:
    min_stroke_bars: 6
symbol_level:
  "*.1d":
    zhongshu_merge_gap: 9
  aapl.*:
    divergence_lookback: 4
  aapl.1d:
    min_stroke_bars: 7
"#;
    let profile = ChanProfileConfig::from_yaml_str(yaml).expect("valid profile");

    let aapl_daily = profile.resolve_for("aapl", Level::D1);
    assert_eq!(aapl_daily.min_stroke_bars, 7);
    assert_eq!(aapl_daily.divergence_lookback, 4);
    assert_eq!(aapl_daily.zhongshu_merge_gap, 9);

    let aapl_weekly = profile.resolve_for("AAPL", Level::W1);
    assert_eq!(aapl_weekly.min_stroke_bars, 6);
    assert_eq!(aapl_weekly.divergence_lookback, 4);
    assert_eq!(aapl_weekly.zhongshu_merge_gap, 5);

    let msft_daily = profile.resolve_for("MSFT", Level::D1);
    assert_eq!(msft_daily.min_stroke_bars, 5);
    assert_eq!(msft_daily.divergence_lookback, 3);
    assert_eq!(msft_daily.zhongshu_merge_gap, 9);

    let msft_minute = profile.resolve_for("MSFT", Level::M1);
    assert_eq!(msft_minute.min_stroke_bars, 4);
    assert_eq!(msft_minute, ChanConfig { min_stroke_bars: 4, ..ChanConfig::default() });
}

#[test]
fn level_labels_parse_case_insensitively() {
    assert_eq!(Level::parse("1D").expect("daily"), Level::D1);
    assert_eq!(Level::parse(" 30m ").expect("thirty minutes"), Level::M30);
    assert_eq!(Level::parse("1wk").expect("weekly"), Level::W1);
    assert!(matches!(Level::parse("4h"), Err(ChanError::InvalidLevel(_))));
    for level in Level::ALL {
        assert_eq!(Level::parse(level.as_str()).expect("round trip"), level);
    }
}

#[test]
fn level_list_comes_from_level_independent_layers() {
    let yaml = r#"
default:
  levels: ["1d", "1w"]
level:
  1d:
    levels: ["1m"]
symbol_level:
  spy.*:
    levels: ["30m", "1d"]
"#;
    let profile = ChanProfileConfig::from_yaml_str(yaml).expect("valid profile");

    assert_eq!(profile.levels_for("QQQ"), vec![Level::D1, Level::W1]);
    assert_eq!(profile.levels_for("SPY"), vec![Level::M30, Level::D1]);
    assert_eq!(ChanProfileConfig::default().levels_for("QQQ"), Level::ALL.to_vec());
}
