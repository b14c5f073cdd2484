/// 指数平滑，`alpha = 2 / (period + 1)`，以首个值作为种子。
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            alpha: 2.0 / (period.max(1) as f64 + 1.0),
            value: None,
        }
    }

    /// 对整段序列求 EMA，长度与输入一致。
    pub fn series(period: usize, prices: &[f64]) -> Vec<f64> {
        let mut ema = Self::new(period);
        prices.iter().map(|price| ema.next(*price)).collect()
    }

    fn next(&mut self, price: f64) -> f64 {
        let value = match self.value {
            None => price,
            Some(prev) => prev + self.alpha * (price - prev),
        };
        self.value = Some(value);
        value
    }
}
