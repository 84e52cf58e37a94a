//! Downstream integrations — translate normalized mobile analytics events
//! (lifecycle, identify, track, reset) into a push-marketing sink's native
//! calls.
//!
//! # Modules
//!
//! - [`integration`] — capability trait every integration implements
//! - [`router`] — push-marketing event router and revenue conversion
//! - [`sink`] — sink call contract, recording and log-only sinks
//! - [`host`] — host capability and log-level probe
//! - [`settings`] — project settings document and typed routing config
//! - [`manager`] — dispatcher fanning events out to ready integrations

pub mod host;
pub mod integration;
pub mod manager;
pub mod router;
pub mod settings;
pub mod sink;

pub use host::{HostEnvironment, StaticHost};
pub use integration::Integration;
pub use manager::{InitReport, IntegrationManager};
pub use router::EventRouter;
pub use settings::{ProjectSettings, RoutingConfig};
pub use sink::{MarketingSink, RecordingSink, SinkCall, SinkCredentialKind, TracingSink};
