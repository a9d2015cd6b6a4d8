//! Command-line runner.
//!
//! For each selected variant this builds one harness, runs every selected
//! shape in every selected threading mode (warm-up invocations first, then
//! measured ones), and prints one CSV row per combination with the mean
//! latency per operation. Logs go to stderr; set `RUST_LOG` to adjust.
//!
//! ```bash
//! cargo run --release -- --variants lock,concurrent --shapes putget --workers 4
//! ```

use std::hint::black_box;
use std::num::NonZeroUsize;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cache_shootout::{CacheKind, Harness, HarnessConfig, Result, Shape, Threading};

#[derive(Parser, Debug)]
#[command(name = "cache-shootout")]
#[command(about = "Measure integer cache variants and verify them after every run")]
struct Args {
    /// Cache variants to measure (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_values_t = CacheKind::ALL.to_vec())]
    variants: Vec<CacheKind>,

    /// Workload shapes: get, put, putget (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_values_t = Shape::ALL.to_vec())]
    shapes: Vec<Shape>,

    /// Threading modes: single, multi (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_values_t = vec![Threading::Single, Threading::Multi])]
    threading: Vec<Threading>,

    /// Worker threads used by multi-threaded invocations
    #[arg(short, long, default_value_t = 2)]
    workers: usize,

    /// Operations per invocation
    #[arg(short, long, default_value_t = 1_000_000)]
    ops: usize,

    /// Key domain is [0, 2^bits - 1]
    #[arg(long, default_value_t = 20)]
    domain_bits: u32,

    /// Override the variant's default sizing
    #[arg(long)]
    capacity: Option<usize>,

    /// Unmeasured invocations before each measurement
    #[arg(long, default_value_t = 1)]
    warmup: usize,

    /// Measured invocations averaged per row
    #[arg(long, default_value = "3")]
    iterations: NonZeroUsize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "run aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    println!("variant,shape,threading,workers,ns_per_op");

    for &kind in &args.variants {
        let mut builder = HarnessConfig::builder()
            .kind(kind)
            .domain_bits(args.domain_bits)
            .workers(args.workers)
            .ops_per_invocation(args.ops);
        if let Some(capacity) = args.capacity {
            builder = builder.capacity(capacity);
        }
        let config = builder.build()?;

        let mut harness = Harness::setup(&config)?;
        for &shape in &args.shapes {
            for &threading in &args.threading {
                if threading == Threading::Multi
                    && shape.writes()
                    && harness.cache().as_shared().is_none()
                {
                    warn!(variant = %kind, %shape, "skipping concurrent writes to unsynchronized cache");
                    continue;
                }

                for _ in 0..args.warmup {
                    black_box(harness.measure(shape, threading)?.checksum);
                }

                let mut total_ns = 0.0;
                let mut threads = 1;
                for _ in 0..args.iterations.get() {
                    let m = harness.measure(shape, threading)?;
                    black_box(m.checksum);
                    total_ns += m.nanos_per_op();
                    threads = m.threads;
                }
                let mean = total_ns / args.iterations.get() as f64;
                println!("{kind},{shape},{threading},{threads},{mean:.2}");
            }
        }

        let report = harness.teardown()?;
        info!(
            variant = %report.kind,
            keys = report.keys_verified,
            invocations = report.invocations,
            "variant verified"
        );
    }

    Ok(())
}
