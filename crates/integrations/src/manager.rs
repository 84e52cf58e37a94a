//! Integration manager — the upstream dispatch layer. Initializes every
//! registered integration from the project settings and fans normalized
//! events out to those that came up.

use campaign_core::events::NormalizedEvent;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::host::HostEnvironment;
use crate::integration::Integration;
use crate::settings::ProjectSettings;

/// Outcome of [`IntegrationManager::initialize_all`], by integration key.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InitReport {
    pub ready: Vec<String>,
    /// No settings entry, so the integration is not enabled for this project.
    pub skipped: Vec<String>,
    /// Key and error message of integrations whose setup failed.
    pub failed: Vec<(String, String)>,
}

pub struct IntegrationManager {
    pending: Vec<Box<dyn Integration>>,
    ready: Vec<Box<dyn Integration>>,
}

impl IntegrationManager {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            ready: Vec::new(),
        }
    }

    pub fn register(&mut self, integration: Box<dyn Integration>) {
        debug!(integration = integration.key(), "Integration registered");
        self.pending.push(integration);
    }

    /// Configure every pending integration. A failing integration is dropped
    /// and never blocks the others.
    pub fn initialize_all(
        &mut self,
        settings: &ProjectSettings,
        host: &dyn HostEnvironment,
    ) -> InitReport {
        let mut report = InitReport::default();

        for mut integration in std::mem::take(&mut self.pending) {
            let key = integration.key().to_string();
            let Some(integration_settings) = settings.for_integration(&key) else {
                debug!(integration = %key, "No settings, integration disabled");
                report.skipped.push(key);
                continue;
            };

            match integration.configure(integration_settings, host) {
                Ok(()) => {
                    report.ready.push(key);
                    self.ready.push(integration);
                }
                Err(e) => {
                    warn!(integration = %key, error = %e, "Integration failed to initialize");
                    report.failed.push((key, e.to_string()));
                }
            }
        }

        info!(
            ready = report.ready.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Integrations initialized"
        );
        report
    }

    /// Forward one event to every ready integration, in registration order.
    pub fn dispatch(&self, event: &NormalizedEvent) {
        debug!(kind = event.kind(), targets = self.ready.len(), "Dispatching event");
        for integration in &self.ready {
            integration.translate(event);
        }
    }

    pub fn ready_keys(&self) -> Vec<&str> {
        self.ready.iter().map(|i| i.key()).collect()
    }

    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }
}

impl Default for IntegrationManager {
    fn default() -> Self {
        Self::new()
    }
}
