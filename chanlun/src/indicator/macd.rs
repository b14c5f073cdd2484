use serde::Serialize;

use super::ema::Ema;

/// MACD 三条序列，均与收盘价序列等长。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacdSeries {
    pub dif: Vec<f64>,
    pub dea: Vec<f64>,
    /// `2 * (dif - dea)`
    pub hist: Vec<f64>,
}

impl MacdSeries {
    pub fn len(&self) -> usize {
        self.hist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }
}

pub struct Macd;

impl Macd {
    pub fn compute(fast: usize, slow: usize, signal: usize, closes: &[f64]) -> MacdSeries {
        let ema_fast = Ema::series(fast, closes);
        let ema_slow = Ema::series(slow, closes);
        let dif: Vec<f64> = ema_fast
            .iter()
            .zip(&ema_slow)
            .map(|(f, s)| f - s)
            .collect();
        let dea = Ema::series(signal, &dif);
        let hist = dif.iter().zip(&dea).map(|(d, e)| (d - e) * 2.0).collect();
        MacdSeries { dif, dea, hist }
    }
}
