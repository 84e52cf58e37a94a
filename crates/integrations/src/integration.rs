//! Integration capability trait — lifecycle hooks and event handlers shared
//! by every downstream integration.

use campaign_core::error::CampaignResult;
use campaign_core::events::{IdentifyEvent, NormalizedEvent, TrackEvent};
use campaign_core::types::LifecyclePhase;

use crate::host::HostEnvironment;

/// A downstream integration. Handlers default to no-ops so an integration
/// only implements the events it forwards.
pub trait Integration {
    /// Key under which this integration's settings live in the project
    /// settings document.
    fn key(&self) -> &str;

    /// One-time setup from the integration's settings object.
    fn configure(
        &mut self,
        settings: &serde_json::Value,
        host: &dyn HostEnvironment,
    ) -> CampaignResult<()>;

    fn on_lifecycle(&self, _phase: LifecyclePhase) {}

    fn identify(&self, _event: &IdentifyEvent) {}

    fn track(&self, _event: &TrackEvent) {}

    fn reset(&self) {}

    /// Route one event to the matching handler.
    fn translate(&self, event: &NormalizedEvent) {
        match event {
            NormalizedEvent::Lifecycle { phase } => self.on_lifecycle(*phase),
            NormalizedEvent::Identify(identify) => self.identify(identify),
            NormalizedEvent::Track(track) => self.track(track),
            NormalizedEvent::Reset => self.reset(),
        }
    }
}
