use anyhow::Result;
use clap::{Parser, ValueEnum};
use client_core::{view, DispatchHarness, DispatchOutcome};
use shared::domain::DispatchMode;
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// Endpoint of the blocking checkout service.
    #[arg(long, default_value = "http://127.0.0.1:8000/checkout")]
    sync_url: String,
    /// Endpoint of the queue-backed checkout service.
    #[arg(long, default_value = "http://127.0.0.1:8001/checkout")]
    async_url: String,
    /// Which dispatch to trigger.
    #[arg(long, value_enum, default_value = "both")]
    mode: Trigger,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Trigger {
    Sync,
    Async,
    Both,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let harness = DispatchHarness::over_http(args.sync_url, args.async_url);

    match args.mode {
        Trigger::Sync => report(harness.dispatch(DispatchMode::Sync).await),
        Trigger::Async => report(harness.dispatch(DispatchMode::Async).await),
        Trigger::Both => {
            info!("dispatching both modes concurrently");
            let (sync_outcome, async_outcome) = tokio::join!(
                harness.dispatch(DispatchMode::Sync),
                harness.dispatch(DispatchMode::Async)
            );
            report(async_outcome);
            report(sync_outcome);
        }
    }

    let state = view::render(&harness).await;
    println!("Recent activity ({} recorded):", state.total_recorded);
    for line in &state.feed {
        println!(
            "  {} [{}] {} {} at {}",
            line.order_ref,
            view::mode_label(line.mode),
            line.status.as_str(),
            line.duration_label,
            line.logged_at
        );
    }

    Ok(())
}

fn report(outcome: DispatchOutcome) {
    match outcome {
        DispatchOutcome::Settled(entry) => println!(
            "{} checkout settled: {} in {}ms",
            entry.mode.as_str(),
            entry.status.as_str(),
            entry.duration_ms
        ),
        DispatchOutcome::AlreadyInFlight => println!("dispatch skipped: already in flight"),
    }
}
