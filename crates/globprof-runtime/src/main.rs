//! globprof demo driver
//!
//! - Config from `PROFILER_CONFIG` (YAML) or `PROFILER_*` env vars
//! - Registers the count/doubled/elapsed sample mutations
//! - One unit of work per millisecond, `mutate()` every `interval` units
//! - Stops on Ctrl-C or after `PROFILER_DEMO_TICKS` units, then closes the log

use std::time::{Duration, Instant};

use tracing_subscriber::{fmt, EnvFilter};

use globprof_core::error::Result;
use globprof_runtime::{config, demo, ProcessProfiler};

const ENV_DEMO_TICKS: &str = "PROFILER_DEMO_TICKS";

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for debug snapshots
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load()?;
    let limit: Option<u64> = std::env::var(ENV_DEMO_TICKS)
        .ok()
        .and_then(|v| v.trim().parse().ok());

    let mut profiler = ProcessProfiler::open(cfg);
    demo::register_all(&mut profiler, Instant::now());

    let every = u64::from(profiler.interval()).max(1);
    let mut ticker = tokio::time::interval(Duration::from_millis(1));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut work: u64 = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!(work, "interrupted");
                break;
            }
            _ = ticker.tick() => {
                work += 1;
                if work % every == 0 {
                    profiler.mutate();
                }
                if limit.is_some_and(|l| work >= l) {
                    break;
                }
            }
        }
    }

    profiler.close();
    tracing::info!(work, invocations = profiler.invocations(), "globprof done");
    Ok(())
}
