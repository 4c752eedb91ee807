//! `axiom-stress`: hammers an `AtomicCell` and a `SpinMutex` from many
//! threads and checks that no update was lost.
//!
//! Each thread increments a shared counter `--iterations` times, then every
//! thread decrements it the same number of times; the counter must land back
//! on zero. A second phase does the same increments through a `SpinMutex`.
//!
//! ```text
//! axiom-stress --threads 100 --iterations 1000 --backend interlocked
//! RUST_LOG=axiom_atomic=trace axiom-stress
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use axiom_atomic::{AtomicCell, Backend, Builtin, Interlocked, Library, Selected, SpinMutex};
use clap::{Parser, ValueEnum};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    /// Whatever this build selected
    Selected,
    Builtin,
    Interlocked,
    Library,
}

#[derive(Parser)]
#[command(name = "axiom-stress")]
#[command(about = "Concurrent stress test for the atomic cell and spinlock")]
struct Args {
    /// Number of worker threads
    #[arg(long, default_value_t = 100)]
    threads: usize,

    /// Operations per thread in each phase
    #[arg(long, default_value_t = 1000)]
    iterations: u64,

    /// Atomic backend to exercise
    #[arg(long, value_enum, default_value_t = BackendArg::Selected)]
    backend: BackendArg,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_names(true))
        .init();
}

/// Runs `work` on `threads` threads and waits for all of them.
fn fan_out<S: Send + Sync + 'static>(
    threads: usize,
    shared: &Arc<S>,
    work: fn(&S, u64),
    iterations: u64,
) -> Result<(), String> {
    let handles: Vec<_> = (0..threads)
        .map(|id| {
            let shared = shared.clone();
            thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn(move || work(&shared, iterations))
                .map_err(|e| format!("failed to spawn worker {id}: {e}"))
        })
        .collect::<Result<_, _>>()?;

    for handle in handles {
        handle
            .join()
            .map_err(|_| "worker thread panicked".to_string())?;
    }
    Ok(())
}

fn run<B: Backend>(threads: usize, iterations: u64) -> Result<bool, String> {
    tracing::info!(backend = %B::KIND, threads, iterations, "starting");
    let expected = threads as u64 * iterations;
    let mut ok = true;

    let counter = Arc::new(AtomicCell::<u64, B>::with_backend(0));

    let start = Instant::now();
    fan_out(
        threads,
        &counter,
        |c, n| {
            for _ in 0..n {
                c.increment();
            }
        },
        iterations,
    )?;
    let after_increments = counter.load();
    tracing::info!(
        value = after_increments,
        expected,
        elapsed = ?start.elapsed(),
        "increment phase done"
    );
    ok &= after_increments == expected;

    let start = Instant::now();
    fan_out(
        threads,
        &counter,
        |c, n| {
            for _ in 0..n {
                c.decrement();
            }
        },
        iterations,
    )?;
    let after_decrements = counter.load();
    tracing::info!(
        value = after_decrements,
        expected = 0,
        elapsed = ?start.elapsed(),
        "decrement phase done"
    );
    ok &= after_decrements == 0;

    let guarded = Arc::new(SpinMutex::<u64, B>::with_backend(0));
    let start = Instant::now();
    fan_out(
        threads,
        &guarded,
        |m, n| {
            for _ in 0..n {
                *m.lock() += 1;
            }
        },
        iterations,
    )?;
    let locked_total = *guarded.lock();
    tracing::info!(
        value = locked_total,
        expected,
        elapsed = ?start.elapsed(),
        "spin mutex phase done"
    );
    ok &= locked_total == expected;

    Ok(ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let result = match args.backend {
        BackendArg::Selected => run::<Selected>(args.threads, args.iterations),
        BackendArg::Builtin => run::<Builtin>(args.threads, args.iterations),
        BackendArg::Interlocked => run::<Interlocked>(args.threads, args.iterations),
        BackendArg::Library => run::<Library>(args.threads, args.iterations),
    };

    match result {
        Ok(true) => {
            tracing::info!("no lost updates");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            tracing::error!("lost update detected");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "stress run aborted");
            ExitCode::FAILURE
        }
    }
}
