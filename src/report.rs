//! Serializable reports printed by the CLI

use serde::Serialize;
use std::time::Duration;

use crate::algorithm::{FeedbackStats, KECCAK_ROUNDS, PAGE_BYTES};

/// Feedback counter snapshot with the derived hit ratio
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StatsReport {
    pub calls: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
}

impl From<FeedbackStats> for StatsReport {
    fn from(stats: FeedbackStats) -> Self {
        Self {
            calls: stats.calls,
            hits: stats.hits,
            misses: stats.misses,
            hit_ratio: stats.hit_ratio(),
        }
    }
}

impl std::fmt::Display for StatsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "calls: {} [{}]; hits: {} ({:.2} %), misses: {}",
            self.calls,
            self.calls % KECCAK_ROUNDS as u64,
            self.hits,
            self.hit_ratio,
            self.misses
        )
    }
}

/// Result of loading or building the table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableReport {
    pub dir: String,
    pub pages: usize,
    pub memory_mb: usize,
    pub elapsed_ms: f64,
}

impl TableReport {
    pub fn new(dir: String, pages: usize, elapsed: Duration) -> Self {
        Self {
            dir,
            pages,
            memory_mb: pages * PAGE_BYTES / (1024 * 1024),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Throughput measurement
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchReport {
    pub variant: String,
    pub count: u64,
    pub threads: usize,
    pub elapsed_ms: f64,
    pub hashrate: f64,
    pub feedback: StatsReport,
}

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_report_from_snapshot() {
        let report = StatsReport::from(FeedbackStats {
            calls: 48,
            hits: 36,
            misses: 12,
        });
        assert_eq!(report.hit_ratio, 75.0);
        assert_eq!(
            report.to_string(),
            "calls: 48 [0]; hits: 36 (75.00 %), misses: 12"
        );

        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["hits"], 36);
        assert_eq!(json["hit_ratio"], 75.0);
    }

    #[test]
    fn test_table_report_memory() {
        let report = TableReport::new("pages".into(), 3, Duration::from_millis(1500));
        assert_eq!(report.memory_mb, 24);
        assert_eq!(report.elapsed_ms, 1500.0);
    }
}
