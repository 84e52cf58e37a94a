//! Push-marketing sink — the fixed call contract of the downstream vendor
//! SDK, plus a recording double and a log-only implementation.
//!
//! Routers accept an `Arc<dyn MarketingSink>` so the vendor handle is
//! injected rather than reached through a process-wide singleton.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::info;

/// Identity-linking slots the sink tracks per user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SinkCredentialKind {
    Username,
    Email,
    Facebook,
    Twitter,
    LinkedIn,
}

impl SinkCredentialKind {
    /// Every slot, in the order they are forwarded.
    pub const ALL: [SinkCredentialKind; 5] = [
        SinkCredentialKind::Username,
        SinkCredentialKind::Email,
        SinkCredentialKind::Facebook,
        SinkCredentialKind::Twitter,
        SinkCredentialKind::LinkedIn,
    ];

    /// The reserved trait key holding this credential.
    pub fn trait_key(self) -> &'static str {
        match self {
            SinkCredentialKind::Username => "username",
            SinkCredentialKind::Email => "email",
            SinkCredentialKind::Facebook => "facebook",
            SinkCredentialKind::Twitter => "twitter",
            SinkCredentialKind::LinkedIn => "linkedin",
        }
    }
}

/// Downstream sink contract. Calls are fire-and-forget.
pub trait MarketingSink: Send + Sync {
    fn app_create(&self, api_key: &str, push_sender_id: &str);

    fn set_debug_mode(&self, enabled: bool);

    fn start(&self);

    fn stop(&self);

    fn set_username_and_email(&self, name: Option<&str>, email: Option<&str>);

    fn set_credential(&self, kind: SinkCredentialKind, value: Option<&str>);

    fn set_user_attributes(&self, attributes: &HashMap<String, String>);

    fn track_event(&self, name: &str, quantity: i64, revenue_cents: i64);

    fn logout(&self);
}

/// One call made against a sink, as captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SinkCall {
    AppCreate {
        api_key: String,
        push_sender_id: String,
    },
    SetDebugMode {
        enabled: bool,
    },
    Start,
    Stop,
    SetUsernameAndEmail {
        name: Option<String>,
        email: Option<String>,
    },
    SetCredential {
        kind: SinkCredentialKind,
        value: Option<String>,
    },
    SetUserAttributes {
        attributes: HashMap<String, String>,
    },
    TrackEvent {
        name: String,
        quantity: i64,
        revenue_cents: i64,
    },
    Logout,
}

/// In-memory sink that captures calls for tests and dry runs.
#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().expect("sink mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().expect("sink mutex poisoned").len()
    }

    /// Number of captured calls matching `pred`.
    pub fn count_where(&self, pred: impl Fn(&SinkCall) -> bool) -> usize {
        self.calls
            .lock()
            .expect("sink mutex poisoned")
            .iter()
            .filter(|c| pred(c))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().expect("sink mutex poisoned").clear();
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().expect("sink mutex poisoned").push(call);
    }
}

impl MarketingSink for RecordingSink {
    fn app_create(&self, api_key: &str, push_sender_id: &str) {
        self.record(SinkCall::AppCreate {
            api_key: api_key.to_string(),
            push_sender_id: push_sender_id.to_string(),
        });
    }

    fn set_debug_mode(&self, enabled: bool) {
        self.record(SinkCall::SetDebugMode { enabled });
    }

    fn start(&self) {
        self.record(SinkCall::Start);
    }

    fn stop(&self) {
        self.record(SinkCall::Stop);
    }

    fn set_username_and_email(&self, name: Option<&str>, email: Option<&str>) {
        self.record(SinkCall::SetUsernameAndEmail {
            name: name.map(String::from),
            email: email.map(String::from),
        });
    }

    fn set_credential(&self, kind: SinkCredentialKind, value: Option<&str>) {
        self.record(SinkCall::SetCredential {
            kind,
            value: value.map(String::from),
        });
    }

    fn set_user_attributes(&self, attributes: &HashMap<String, String>) {
        self.record(SinkCall::SetUserAttributes {
            attributes: attributes.clone(),
        });
    }

    fn track_event(&self, name: &str, quantity: i64, revenue_cents: i64) {
        self.record(SinkCall::TrackEvent {
            name: name.to_string(),
            quantity,
            revenue_cents,
        });
    }

    fn logout(&self) {
        self.record(SinkCall::Logout);
    }
}

/// Sink that only logs. Used when no vendor SDK is linked in.
pub struct TracingSink;

impl MarketingSink for TracingSink {
    fn app_create(&self, _api_key: &str, push_sender_id: &str) {
        // api key stays out of the logs
        info!(push_sender_id, "sink: app_create");
    }

    fn set_debug_mode(&self, enabled: bool) {
        info!(enabled, "sink: set_debug_mode");
    }

    fn start(&self) {
        info!("sink: start");
    }

    fn stop(&self) {
        info!("sink: stop");
    }

    fn set_username_and_email(&self, name: Option<&str>, email: Option<&str>) {
        info!(?name, ?email, "sink: set_username_and_email");
    }

    fn set_credential(&self, kind: SinkCredentialKind, value: Option<&str>) {
        info!(?kind, ?value, "sink: set_credential");
    }

    fn set_user_attributes(&self, attributes: &HashMap<String, String>) {
        info!(attribute_count = attributes.len(), "sink: set_user_attributes");
    }

    fn track_event(&self, name: &str, quantity: i64, revenue_cents: i64) {
        info!(name, quantity, revenue_cents, "sink: track_event");
    }

    fn logout(&self) {
        info!("sink: logout");
    }
}

/// Convenience: create a recording sink for tests.
pub fn recording_sink() -> Arc<RecordingSink> {
    Arc::new(RecordingSink::new())
}

/// Convenience: create a log-only sink.
pub fn tracing_sink() -> Arc<dyn MarketingSink> {
    Arc::new(TracingSink)
}
