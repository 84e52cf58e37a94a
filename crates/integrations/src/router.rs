//! Event router — translates normalized analytics events into the
//! push-marketing sink's native calls.
//!
//! The router holds no state beyond its routing config. Each handler maps
//! one event onto a fixed sequence of sink calls:
//!
//! | Event            | Sink calls                                                   |
//! |------------------|--------------------------------------------------------------|
//! | lifecycle start  | `start`                                                      |
//! | lifecycle stop   | `stop`                                                       |
//! | identify         | `set_username_and_email`, 5 × `set_credential`, `set_user_attributes` |
//! | track            | `track_event` (revenue in cents)                             |
//! | reset            | `logout`                                                     |

use std::sync::Arc;

use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::events::{IdentifyEvent, TrackEvent};
use campaign_core::types::LifecyclePhase;
use tracing::{debug, info, warn};

use crate::host::{HostEnvironment, SUPPORT_LIBRARY};
use crate::integration::Integration;
use crate::settings::RoutingConfig;
use crate::sink::{MarketingSink, SinkCredentialKind};

/// Settings key for the push-marketing integration.
pub const ROUTER_KEY: &str = "PushMarketing";

pub struct EventRouter {
    sink: Arc<dyn MarketingSink>,
    config: Option<RoutingConfig>,
}

impl EventRouter {
    pub fn new(sink: Arc<dyn MarketingSink>) -> Self {
        Self { sink, config: None }
    }

    pub fn config(&self) -> Option<&RoutingConfig> {
        self.config.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    /// Register the app with the sink. Fails without touching the sink when
    /// the host does not bundle the support library.
    pub fn initialize(
        &mut self,
        config: RoutingConfig,
        host: &dyn HostEnvironment,
    ) -> CampaignResult<()> {
        if !host.has_capability(SUPPORT_LIBRARY) {
            warn!(
                integration = ROUTER_KEY,
                capability = SUPPORT_LIBRARY,
                "Required host capability missing"
            );
            return Err(CampaignError::Precondition(format!(
                "{ROUTER_KEY} requires '{SUPPORT_LIBRARY}' to be bundled"
            )));
        }

        self.sink.app_create(&config.api_key, &config.push_sender_id);
        self.sink.set_debug_mode(config.debug_mode);

        info!(
            integration = ROUTER_KEY,
            push_sender_id = %config.push_sender_id,
            debug_mode = config.debug_mode,
            "Event router initialized"
        );
        self.config = Some(config);
        Ok(())
    }
}

impl Integration for EventRouter {
    fn key(&self) -> &str {
        ROUTER_KEY
    }

    fn configure(
        &mut self,
        settings: &serde_json::Value,
        host: &dyn HostEnvironment,
    ) -> CampaignResult<()> {
        let config = RoutingConfig::from_settings(settings, host.log_level())?;
        self.initialize(config, host)
    }

    fn on_lifecycle(&self, phase: LifecyclePhase) {
        debug!(?phase, "Forwarding lifecycle");
        match phase {
            LifecyclePhase::Started => self.sink.start(),
            LifecyclePhase::Stopped => self.sink.stop(),
        }
    }

    fn identify(&self, event: &IdentifyEvent) {
        let traits = &event.traits;
        let display_name = traits
            .username()
            .filter(|name| !name.is_empty())
            .or_else(|| event.user_id.clone());

        self.sink
            .set_username_and_email(display_name.as_deref(), traits.email().as_deref());

        for kind in SinkCredentialKind::ALL {
            let value = traits.get_string(kind.trait_key());
            self.sink.set_credential(kind, value.as_deref());
        }

        self.sink.set_user_attributes(&traits.to_string_map());

        debug!(
            user_id = ?event.user_id,
            trait_count = traits.len(),
            "Forwarded identify"
        );
    }

    fn track(&self, event: &TrackEvent) {
        let quantity = event.properties.quantity();
        let revenue_cents = revenue_to_cents(event.properties.revenue());

        self.sink.track_event(&event.event, quantity, revenue_cents);

        debug!(
            event = %event.event,
            quantity,
            revenue_cents,
            "Forwarded track"
        );
    }

    fn reset(&self) {
        debug!("Forwarding reset");
        self.sink.logout();
    }
}

/// Convert a dollar amount to whole cents, truncating sub-cent fractions
/// toward zero. The scaled value is first snapped to 6 decimal places so
/// binary representation error (19.99 * 100 = 1998.9999999999998) does not
/// cost a cent.
pub fn revenue_to_cents(revenue: f64) -> i64 {
    let scaled = revenue * 100.0;
    let snapped = (scaled * 1e6).round() / 1e6;
    snapped.trunc() as i64
}
