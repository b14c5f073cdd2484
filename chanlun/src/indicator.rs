pub mod ema;
pub mod macd;

pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
