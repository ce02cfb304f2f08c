//! Throughput benchmark
//!
//! Hashes `count` random payloads split across `threads` worker threads that
//! share one [`Msha3`], so the table and counters are exercised the way a
//! node uses them.

use log::debug;
use std::time::Instant;

use crate::algorithm::{Msha3, Variant};
use crate::report::{BenchReport, StatsReport};

/// Size of each random payload (a block header is 80 bytes)
pub const PAYLOAD_SIZE: usize = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    pub count: u64,
    pub threads: usize,
    pub variant: Variant,
}

impl BenchConfig {
    pub fn new(count: u64, threads: usize, variant: Variant) -> Self {
        Self {
            count,
            threads: threads.max(1),
            variant,
        }
    }

    /// Hashes assigned to `worker`; the remainder goes to the first workers
    fn share(&self, worker: usize) -> u64 {
        let threads = self.threads as u64;
        let base = self.count / threads;
        let extra = u64::from((worker as u64) < self.count % threads);
        base + extra
    }
}

/// Run the benchmark described by `config` against `hasher`
pub fn run(hasher: &Msha3, config: &BenchConfig) -> Result<BenchReport, getrandom::Error> {
    let mut seed = [0u8; PAYLOAD_SIZE];
    getrandom::getrandom(&mut seed)?;

    let before = hasher.stats();
    let start = Instant::now();

    std::thread::scope(|scope| {
        for worker in 0..config.threads {
            let share = config.share(worker);
            scope.spawn(move || {
                let mut payload = seed;
                payload[..8].copy_from_slice(&(worker as u64).to_le_bytes());
                for nonce in 0..share {
                    payload[8..16].copy_from_slice(&nonce.to_le_bytes());
                    let _ = hasher.digest(config.variant, &payload);
                }
                debug!("worker {} finished {} hashes", worker, share);
            });
        }
    });

    let elapsed = start.elapsed();
    let feedback = StatsReport::from(hasher.stats().since(&before));
    let secs = elapsed.as_secs_f64();

    Ok(BenchReport {
        variant: format!("{:?}", config.variant).to_lowercase(),
        count: config.count,
        threads: config.threads,
        elapsed_ms: secs * 1000.0,
        hashrate: if secs > 0.0 {
            config.count as f64 / secs
        } else {
            0.0
        },
        feedback,
    })
}
