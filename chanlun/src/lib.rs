pub mod bar;
pub mod batch;
pub mod config;
pub mod constant;
pub mod divergence;
pub mod engine;
pub mod fractal;
pub mod frame;
pub mod inclusion;
pub mod indicator;
pub mod loader;
pub mod logging;
pub mod segment;
pub mod stroke;
mod utils;
pub mod zhongshu;

pub use bar::{Bar, BarNormalizer, RawBar};
pub use batch::{analyze_batch, AnalysisOutcome, AnalysisRequest};
pub use config::{ChanConfig, ChanConfigPatch, ChanProfileConfig};
pub use constant::{ChanError, Direction, DivergenceKind, FractalKind, Level};
pub use divergence::{detect_divergences, Divergence};
pub use engine::{analyze, AnalysisResult, AnalysisSummary, ChanAnalyzer};
pub use fractal::{detect_fractals, Fractal};
pub use frame::{bars_frame, export_parquet};
pub use inclusion::{resolve_inclusion, SmoothedSeries};
pub use indicator::{Ema, Macd, MacdSeries};
pub use loader::{load_bars, load_raw_bars, parse_datetime};
pub use logging::{init_logging, init_logging_with_level};
pub use segment::{build_segments, Segment};
pub use stroke::{build_strokes, Stroke};
pub use zhongshu::{detect_zhongshus, ZhongShu};
