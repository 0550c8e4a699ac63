//! `sync` - reconcile the collection with the remote endpoint.

use crate::Service;
use quotesync_sync::SyncOptions;
use std::io::BufRead;
use std::time::Duration;
use tracing::info;

/// Runs one sync pass, or keeps syncing on an interval with `--watch`.
pub fn run(
    service: &Service,
    watch: bool,
    interval_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Syncing against {}", service.config().server_url);

    if watch {
        service.start_periodic(Duration::from_secs(interval_secs))?;
        println!("Auto-sync every {interval_secs}s; press Enter to stop.");

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        service.stop_periodic();
        println!("Auto-sync stopped.");
        return Ok(());
    }

    let report = service.perform_sync(SyncOptions::default())?;
    println!("{}", report.summary());
    if report.conflicts > 0 {
        println!("Run `quotesync conflicts` to review them.");
    }
    Ok(())
}
