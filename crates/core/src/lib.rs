pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::AppConfig;
pub use error::{CampaignError, CampaignResult};
pub use events::{IdentifyEvent, NormalizedEvent, Properties, TrackEvent, Traits, ValueMap};
pub use types::{LifecyclePhase, LogLevel};
