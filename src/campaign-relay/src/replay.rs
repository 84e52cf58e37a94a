//! JSON-lines replay of normalized events through the dispatcher.

use std::io::BufRead;

use campaign_core::events::NormalizedEvent;
use campaign_integrations::IntegrationManager;
use tracing::warn;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub dispatched: u64,
    pub malformed: u64,
}

/// Dispatch each line of `reader` as one event. Blank lines are ignored and
/// malformed lines are logged and counted, never fatal.
pub fn replay<R: BufRead>(reader: R, manager: &IntegrationManager) -> anyhow::Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<NormalizedEvent>(line) {
            Ok(event) => {
                manager.dispatch(&event);
                stats.dispatched += 1;
            }
            Err(e) => {
                warn!(line = idx + 1, error = %e, "Skipping malformed event");
                stats.malformed += 1;
            }
        }
    }

    Ok(stats)
}
