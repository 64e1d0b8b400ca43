//! Heartbeat worker launched by the fleet controller
//!
//! Prints one line naming its own pid per interval until it is killed.

use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "fleet-worker")]
#[command(about = "Long-running child process that heartbeats until killed")]
#[command(version)]
struct Args {
    /// Milliseconds between heartbeats
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let pid = std::process::id();
    info!("Worker {} started, heartbeat every {}ms", pid, args.interval_ms);

    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    // The first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let mut stdout = std::io::stdout().lock();
        if writeln!(stdout, "Child[{}]: I am child process! I'm still running!", pid)
            .and_then(|()| stdout.flush())
            .is_err()
        {
            // Nobody is reading any more; keep running until killed
            debug!("Heartbeat output unavailable");
        }
    }
}
