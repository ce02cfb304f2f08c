//! Self-test harness
//!
//! Checks the plain mode against published SHA3-512 vectors and the
//! extended mode against pinned vectors under every chunking the node uses,
//! then hashes batches of numbered payloads to show how often the table is
//! hit. Counter deltas are recorded per step, next to a dump of the
//! reduction tiers.

use log::{debug, info, warn};
use serde::Serialize;
use std::ops::Range;
use std::time::Instant;

use crate::algorithm::{Digest, Extended, HashContext, Msha3, TIERS};
use crate::report::StatsReport;

/// SHA3-512("")
pub const PLAIN_EMPTY: &str = "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6\
                               15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26";
/// SHA3-512("abc")
pub const PLAIN_ABC: &str = "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e\
                             10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0";
/// Extended digest of 200 x 0xA3
pub const EXTENDED_A3_200: &str = "9b72856c8dc5223c584bf8c182f003a549e06a236c8797fe1b9371c0aeb5cb7d\
                                   22f7efd0bf8447062be80b764843fd2749d607bc81cb3187f70847e889dd66cb";
/// Extended digest of 199 x 0xA3
pub const EXTENDED_A3_199: &str = "3c4fb4a1605769a8d91da0f62faa2b9845e78fc479b0de658a98de8a142dc311\
                                   8690f4a2f090a1579a6554d470099e6c68f8044c947ca5861f996573c1540f02";
/// Extended digest of 200 x 0xA2
pub const EXTENDED_A2_200: &str = "e92a38dd80f6808f11ee4da48f1b49bdb6439853fba4d359176d68032c4e1c1f\
                                   907905a8517a73f46ad3062508279c48b15a65f4482efd9b625f97511d88f9c2";
/// Extended digest of the empty input
pub const EXTENDED_EMPTY: &str = "f9627715984e23f08f1e00ab0572b5a9959764f4134f2113c61000579eea1f58\
                                  decae4db69051b917ddefbf601fcee1400d4a999fc9c3eb811fc48ce96802483";

/// Payload count of each closing batch
pub const BATCH_SIZE: u32 = 1024;

/// How a batch payload embeds its number
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PayloadShape {
    /// Decimal number once
    #[default]
    Single,
    /// Decimal number eight times in a row
    Repeated,
}

impl PayloadShape {
    const REPEATS: usize = 8;

    /// 200-byte payload starting with the number in this shape and a NUL
    pub fn payload(self, n: u32) -> [u8; 200] {
        let digits = n.to_string();
        let repeats = match self {
            PayloadShape::Single => 1,
            PayloadShape::Repeated => Self::REPEATS,
        };

        let mut payload = [0xA3u8; 200];
        let mut end = 0;
        for _ in 0..repeats {
            payload[end..end + digits.len()].copy_from_slice(digits.as_bytes());
            end += digits.len();
        }
        payload[end] = 0;
        payload
    }

    fn label(self) -> &'static str {
        match self {
            PayloadShape::Single => "numbered",
            PayloadShape::Repeated => "repeated-number",
        }
    }
}

/// One reduction tier: selectors below `limit` address `space` entries
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TierReport {
    pub limit: u64,
    /// `limit` as a share of the selector range, in percent
    pub selector_share: f64,
    pub space: u64,
    /// Table size covering the whole tier, in MiB
    pub memory_mb: u64,
}

/// Every reduction tier, smallest first
pub fn tiers() -> Vec<TierReport> {
    TIERS
        .iter()
        .map(|&(limit, space)| TierReport {
            limit,
            selector_share: limit as f64 / u64::MAX as f64 * 100.0,
            space,
            memory_mb: space * 8 / (1024 * 1024),
        })
        .collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub name: String,
    /// `None` for measurement-only steps
    pub passed: Option<bool>,
    pub digest: Option<String>,
    pub elapsed_ms: f64,
    pub feedback: StatsReport,
}

#[derive(Clone, Debug, Serialize)]
pub struct SelftestReport {
    pub tiers: Vec<TierReport>,
    pub steps: Vec<StepReport>,
}

impl SelftestReport {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| step.passed != Some(false))
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| step.passed == Some(false))
    }
}

/// Run every step against `hasher`
pub fn run(hasher: &Msha3) -> SelftestReport {
    let tiers = tiers();
    for tier in &tiers {
        debug!(
            "tier {:#018x}: {:.4} % of selectors, {} entries ({} MB)",
            tier.limit, tier.selector_share, tier.space, tier.memory_mb
        );
    }

    let a3 = [0xA3u8; 200];
    let a2 = [0xA2u8; 200];

    let steps = vec![
        check(hasher, "plain empty", PLAIN_EMPTY, || hasher.plain(b"")),
        check(hasher, "plain abc", PLAIN_ABC, || hasher.plain(b"abc")),
        check(hasher, "extended empty", EXTENDED_EMPTY, || hasher.extended(b"")),
        check(hasher, "extended 200 x a3, single buffer", EXTENDED_A3_200, || {
            hasher.extended(&a3)
        }),
        check(hasher, "extended 200 x a3, two halves", EXTENDED_A3_200, || {
            chunked(hasher, &a3, 100)
        }),
        check(hasher, "extended 200 x a3, byte by byte", EXTENDED_A3_200, || {
            chunked(hasher, &a3, 1)
        }),
        check(hasher, "extended 199 x a3, byte by byte", EXTENDED_A3_199, || {
            chunked(hasher, &a3[..199], 1)
        }),
        check(hasher, "extended 200 x a2, byte by byte", EXTENDED_A2_200, || {
            chunked(hasher, &a2, 1)
        }),
        batch(hasher, PayloadShape::Single, 0..BATCH_SIZE),
        batch(hasher, PayloadShape::Repeated, BATCH_SIZE..2 * BATCH_SIZE),
    ];

    SelftestReport { tiers, steps }
}

/// Compare one digest against its expected hex, recording the counter delta
fn check(
    hasher: &Msha3,
    name: &str,
    expected: &str,
    compute: impl FnOnce() -> Digest,
) -> StepReport {
    let before = hasher.stats();
    let start = Instant::now();
    let digest = hex::encode(compute());
    let elapsed = start.elapsed();
    let feedback = StatsReport::from(hasher.stats().since(&before));

    let passed = digest == expected;
    if passed {
        info!("{}: ok; {}", name, feedback);
    } else {
        warn!("{}: FAILED, got {}", name, digest);
    }

    StepReport {
        name: name.to_string(),
        passed: Some(passed),
        digest: Some(digest),
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        feedback,
    }
}

/// Hash one payload of `shape` per number in `numbers` and record the
/// feedback counters
pub fn batch(hasher: &Msha3, shape: PayloadShape, numbers: Range<u32>) -> StepReport {
    let count = numbers.len();
    let before = hasher.stats();
    let start = Instant::now();

    for n in numbers {
        let _ = hasher.extended(&shape.payload(n));
    }

    let elapsed = start.elapsed();
    let feedback = StatsReport::from(hasher.stats().since(&before));
    info!(
        "batch of {} {} payloads in {:?}; {}",
        count,
        shape.label(),
        elapsed,
        feedback
    );

    StepReport {
        name: format!("extended batch of {} {} payloads", count, shape.label()),
        passed: None,
        digest: None,
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        feedback,
    }
}

fn chunked(hasher: &Msha3, input: &[u8], chunk_size: usize) -> Digest {
    let resolver = hasher.resolver();
    let mut ctx = HashContext::new(Extended::new(&resolver));
    for chunk in input.chunks(chunk_size) {
        ctx.update(chunk);
    }
    ctx.finalize()
}
