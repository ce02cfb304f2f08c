//! mSHA3 CLI
//!
//! Command-line front end for the memory-hardened hash.
//!
//! # Commands
//!
//! - `digest` - Hash a payload with the plain or extended variant
//! - `precompute` - Build or load the precomputed table
//! - `selftest` - Check conformance vectors and report table hit rates
//! - `stats` - Hash numbered payloads and report the feedback hit ratio
//! - `benchmark` - Run performance benchmark

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::time::Instant;

use msha3::algorithm::{meets_difficulty, DEFAULT_TABLE_DIR, DEFAULT_VERIFY_SAMPLES};
use msha3::bench::{self, BenchConfig};
use msha3::input::Payload;
use msha3::report::{print_json, StatsReport, TableReport};
use msha3::selftest::{self, PayloadShape};
use msha3::{Msha3, TableConfig, Variant};

#[derive(Parser)]
#[command(name = "msha3")]
#[command(author = "Scash developers")]
#[command(version)]
#[command(about = "mSHA3 memory-hardened hashing tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the table page files
    #[arg(long, global = true, env = "MSHA3_TABLE_DIR")]
    table_dir: Option<PathBuf>,

    /// Number of 8 MiB table pages
    #[arg(long, global = true, env = "MSHA3_PAGES", default_value = "1")]
    pages: usize,

    /// Entries re-checked per loaded page (0 trusts page files)
    #[arg(long, global = true, default_value_t = DEFAULT_VERIFY_SAMPLES)]
    verify_samples: usize,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a payload
    Digest {
        /// Text to hash
        #[arg(conflicts_with_all = ["hex", "file"])]
        text: Option<String>,

        /// Hex-encoded payload
        #[arg(long, conflicts_with = "file")]
        hex: Option<String>,

        /// Hash the contents of a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Use the memory-hardened variant
        #[arg(short, long)]
        extended: bool,

        /// Also check for this many leading zero bits
        #[arg(short, long)]
        difficulty: Option<u32>,
    },

    /// Build or load the precomputed table
    Precompute,

    /// Run conformance vectors and report feedback statistics
    Selftest,

    /// Hash numbered payloads and report the feedback hit ratio
    Stats {
        /// Number of payloads to hash
        #[arg(short, long, default_value = "1024")]
        count: u32,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of hashes to compute
        #[arg(short, long, default_value = "1000")]
        count: u64,

        /// Number of threads to use (default: number of CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Benchmark the memory-hardened variant
        #[arg(short, long)]
        extended: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = table_config(&cli);

    let result = match cli.command {
        Commands::Digest {
            text,
            hex: hex_text,
            file,
            extended,
            difficulty,
        } => cmd_digest(&config, text, hex_text, file, extended, difficulty, cli.json),
        Commands::Precompute => cmd_precompute(&config, cli.json),
        Commands::Selftest => cmd_selftest(&config, cli.json),
        Commands::Stats { count } => cmd_stats(&config, count, cli.json),
        Commands::Benchmark {
            count,
            threads,
            extended,
        } => cmd_benchmark(&config, count, threads, extended, cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::builder()
        .format_timestamp(None)
        .format_level(true)
        .format_target(false)
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn default_table_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("msha3").join("precomp"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TABLE_DIR))
}

fn table_config(cli: &Cli) -> TableConfig {
    let dir = cli.table_dir.clone().unwrap_or_else(default_table_dir);
    TableConfig::new(dir, cli.pages).with_verify_samples(cli.verify_samples)
}

/// Load or build the table, reporting how long it took
fn load_hasher(config: &TableConfig) -> anyhow::Result<(Msha3, TableReport)> {
    let start = Instant::now();
    let hasher = Msha3::initialize(config)
        .with_context(|| format!("Failed to initialize table in {}", config.dir.display()))?;

    let report = TableReport::new(
        config.dir.display().to_string(),
        hasher.table().page_count(),
        start.elapsed(),
    );
    info!(
        "table ready: {} pages ({} MB) in {:.0} ms",
        report.pages, report.memory_mb, report.elapsed_ms
    );

    Ok((hasher, report))
}

fn cmd_digest(
    config: &TableConfig,
    text: Option<String>,
    hex_text: Option<String>,
    file: Option<PathBuf>,
    extended: bool,
    difficulty: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let payload = match (text, hex_text, file) {
        (Some(text), None, None) => Payload::Text(text),
        (None, Some(digits), None) => Payload::Hex(digits),
        (None, None, Some(path)) => Payload::File(path),
        _ => anyhow::bail!("Give exactly one of <TEXT>, --hex or --file"),
    };
    let input = payload.bytes()?;

    let (variant, digest) = if extended {
        let (hasher, _) = load_hasher(config)?;
        (Variant::Extended, hasher.extended(&input))
    } else {
        (Variant::Plain, msha3::plain_digest(&input))
    };
    let digest_hex = hex::encode_upper(digest);
    let meets = difficulty.map(|bits| meets_difficulty(&digest, bits));

    if json {
        print_json(&serde_json::json!({
            "variant": format!("{:?}", variant).to_lowercase(),
            "length": input.len(),
            "digest": digest_hex,
            "difficulty": difficulty,
            "meets_difficulty": meets,
        }))?;
        return Ok(());
    }

    println!("{}", digest_hex);
    if let (Some(bits), Some(meets)) = (difficulty, meets) {
        println!(
            "Difficulty {} bits: {}",
            bits,
            if meets { "met" } else { "not met" }
        );
    }

    Ok(())
}

fn cmd_precompute(config: &TableConfig, json: bool) -> anyhow::Result<()> {
    let (_, report) = load_hasher(config)?;

    if json {
        print_json(&report)?;
        return Ok(());
    }

    println!("Table directory: {}", report.dir);
    println!("  Pages: {}", report.pages);
    println!("  Memory: {} MB", report.memory_mb);
    println!("  Time elapsed: {:.2}s", report.elapsed_ms / 1000.0);

    Ok(())
}

fn cmd_selftest(config: &TableConfig, json: bool) -> anyhow::Result<()> {
    let (hasher, _) = load_hasher(config)?;
    let report = selftest::run(&hasher);

    if json {
        print_json(&report)?;
    } else {
        println!("Reduction tiers:");
        for tier in &report.tiers {
            println!(
                "  {:>20} ({:>8.4} %): {:>14} entries, {} MB",
                tier.limit, tier.selector_share, tier.space, tier.memory_mb
            );
        }
        println!();

        for step in &report.steps {
            let status = match step.passed {
                Some(true) => "ok",
                Some(false) => "FAILED",
                None => "--",
            };
            println!("[{:>6}] {}", status, step.name);
            println!("         {}", step.feedback);
        }
    }

    if !report.passed() {
        let failed: Vec<&str> = report.failures().map(|step| step.name.as_str()).collect();
        anyhow::bail!("Self-test failed: {}", failed.join(", "));
    }

    Ok(())
}

fn cmd_stats(config: &TableConfig, count: u32, json: bool) -> anyhow::Result<()> {
    let (hasher, table) = load_hasher(config)?;
    let step = selftest::batch(&hasher, PayloadShape::Single, 0..count);

    if json {
        print_json(&serde_json::json!({
            "table": table,
            "payloads": count,
            "elapsed_ms": step.elapsed_ms,
            "feedback": step.feedback,
        }))?;
        return Ok(());
    }

    let feedback: StatsReport = step.feedback;
    println!("Payloads: {}", count);
    println!("Table pages: {}", table.pages);
    println!("Feedback: {}", feedback);
    println!("Time elapsed: {:.2}s", step.elapsed_ms / 1000.0);

    Ok(())
}

fn cmd_benchmark(
    config: &TableConfig,
    count: u64,
    threads: Option<usize>,
    extended: bool,
    json: bool,
) -> anyhow::Result<()> {
    let variant = if extended {
        Variant::Extended
    } else {
        Variant::Plain
    };
    let threads = threads.unwrap_or_else(num_cpus::get);

    let hasher = if extended {
        load_hasher(config)?.0
    } else {
        Msha3::new()
    };

    if !json {
        println!(
            "Running {:?} benchmark with {} hashes on {} threads...",
            variant, count, threads
        );
    }

    let report = bench::run(&hasher, &BenchConfig::new(count, threads, variant))
        .map_err(|e| anyhow::anyhow!("Failed to seed benchmark payloads: {}", e))?;

    if json {
        print_json(&report)?;
        return Ok(());
    }

    println!("\nResults:");
    println!("  Total hashes: {}", report.count);
    println!("  Time elapsed: {:.2}s", report.elapsed_ms / 1000.0);
    println!("  Hashrate: {:.2} H/s", report.hashrate);

    if extended {
        println!("  Feedback: {}", report.feedback);
        println!("\nTable parameters:");
        println!("  Pages: {}", hasher.table().page_count());
        println!("  Memory: {} MB", config.memory_bytes() / (1024 * 1024));
    }

    Ok(())
}
