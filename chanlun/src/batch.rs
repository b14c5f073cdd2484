//! 多个独立分析请求的并发执行。
//!
//! 请求经有界队列分发给工作线程，每个请求持有自己的输入与输出，
//! 单个请求校验失败只影响该请求本身。结果按请求顺序返回。

use std::thread;

use crossbeam::channel;
use tracing::{debug, warn};

use crate::bar::Bar;
use crate::config::ChanConfig;
use crate::constant::ChanError;
use crate::engine::{AnalysisResult, ChanAnalyzer};

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// 调用方自定义的标识，例如 `AAPL.1d`。
    pub key: String,
    pub bars: Vec<Bar>,
    pub config: ChanConfig,
}

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub key: String,
    pub result: Result<AnalysisResult, ChanError>,
}

pub fn analyze_batch(requests: Vec<AnalysisRequest>, workers: usize) -> Vec<AnalysisOutcome> {
    let total = requests.len();
    if total == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, total);

    let (job_tx, job_rx) = channel::bounded::<(usize, AnalysisRequest)>(workers);
    let (out_tx, out_rx) = channel::unbounded::<(usize, AnalysisOutcome)>();

    thread::scope(|scope| {
        for worker_id in 0..workers {
            let job_rx = job_rx.clone();
            let out_tx = out_tx.clone();
            scope.spawn(move || {
                for (slot, request) in job_rx.iter() {
                    debug!(worker_id, key = %request.key, "analysis request picked up");
                    let result = ChanAnalyzer::new(request.config).analyze(&request.bars);
                    if let Err(err) = &result {
                        warn!(key = %request.key, error = %err, "analysis request rejected");
                    }
                    let outcome = AnalysisOutcome {
                        key: request.key,
                        result,
                    };
                    if out_tx.send((slot, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(out_tx);
        drop(job_rx);

        for job in requests.into_iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);
    });

    let mut slots: Vec<Option<AnalysisOutcome>> = (0..total).map(|_| None).collect();
    for (slot, outcome) in out_rx.iter() {
        slots[slot] = Some(outcome);
    }
    slots.into_iter().flatten().collect()
}
