//! Resolver Benchmarking Tool
//!
//! Builds a resolver from a postal registry file and measures lookup
//! throughput over a file of addresses, one per line.
//!
//! ## Usage
//!
//! ```bash
//! # UTF-8 registry
//! ./target/release/resolve_bench /path/to/ken_all.csv /path/to/addresses.txt
//!
//! # Official Shift_JIS distribution
//! ./target/release/resolve_bench /path/to/KEN_ALL.CSV /path/to/addresses.txt sjis
//! ```
//!
//! Set `RUST_LOG=yubin_core=debug` to see which phase answers each lookup.
//!
//! ## Example Output
//!
//! ```text
//! Index       : 47 prefectures, 1892 cities, 122413 districts from 124351 rows (0 skipped, 1938 duplicates)
//! Build       : 0.842 s
//! --------------------------------
//! Queries     : 10_000
//! Resolved    : 9_731
//! Absent      : 262
//! Invalid     : 7
//! Elapsed     : 0.061 s
//! Lookups/sec : 163_934
//! --------------------------------
//! ```

use std::env;
use std::error::Error;
use std::fs;
use std::hint::black_box;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;
use yubin_core::{RegistryConfig, RegistryEncoding, Resolver};

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    resolved: u64,
    absent: u64,
    invalid: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: resolve_bench <registry> <queries> [utf8|sjis]");
        std::process::exit(1);
    }

    let encoding = match args.get(3).map(String::as_str) {
        Some("sjis" | "shift_jis") => RegistryEncoding::ShiftJis,
        _ => RegistryEncoding::Utf8,
    };

    let start = Instant::now();
    let resolver = Resolver::build_with_config(&args[1], RegistryConfig { encoding })?;
    let build = start.elapsed();

    let queries = fs::read_to_string(&args[2])?;
    let queries: Vec<&str> = queries
        .lines()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .collect();

    let stats = resolver.stats();
    println!("Index       : {stats}");
    println!("Build       : {:.3} s", build.as_secs_f64());

    warmup(|| {
        black_box(run(&resolver, &queries));
    });

    let mut tally = Tally::default();
    let elapsed = measure(|| {
        tally = black_box(run(&resolver, &queries));
    });

    print_perf(queries.len(), tally, elapsed);

    Ok(())
}

fn run(resolver: &Resolver, queries: &[&str]) -> Tally {
    let mut tally = Tally::default();
    for query in queries {
        match resolver.resolve(query) {
            Ok(Some(_)) => tally.resolved += 1,
            Ok(None) => tally.absent += 1,
            Err(_) => tally.invalid += 1,
        }
    }
    tally
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(queries: usize, tally: Tally, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();

    println!("--------------------------------");
    println!("Queries     : {}", fmt_count(queries as u64));
    println!("Resolved    : {}", fmt_count(tally.resolved));
    println!("Absent      : {}", fmt_count(tally.absent));
    println!("Invalid     : {}", fmt_count(tally.invalid));
    println!("Elapsed     : {:.3} s", secs);

    if secs > 0.0 {
        println!("Lookups/sec : {}", fmt_count((queries as f64 / secs) as u64));
    }

    println!("--------------------------------");
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
