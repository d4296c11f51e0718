#![forbid(unsafe_code)]

//! Service calls and the command sink seam.
//!
//! A [`ServiceCall`] is the only effect the toggle produces. It is handed to
//! a [`CommandSink`] and forgotten: the controller never waits for, or
//! tracks, an acknowledgement. Confirmation arrives later as a new state
//! snapshot.

use serde::{Deserialize, Serialize};

/// `domain.service` invocation targeting one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    #[serde(rename = "service_data", with = "service_data")]
    pub entity_id: String,
}

impl ServiceCall {
    /// Create a call.
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        service: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            entity_id: entity_id.into(),
        }
    }

    /// `domain.service`, as the home-automation UI names it.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.domain, self.service)
    }

    /// Wire form:
    /// `{"domain":..,"service":..,"service_data":{"entity_id":..}}`.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Receiver of fire-and-forget service calls.
pub trait CommandSink {
    /// Issue `call`. Must not block; the result is not observed.
    fn call_service(&mut self, call: &ServiceCall);
}

impl<F> CommandSink for F
where
    F: FnMut(&ServiceCall),
{
    fn call_service(&mut self, call: &ServiceCall) {
        self(call);
    }
}

/// Sink that keeps every call it receives, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    calls: Vec<ServiceCall>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    /// Number of calls received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// True if nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Take all recorded calls, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<ServiceCall> {
        std::mem::take(&mut self.calls)
    }
}

impl CommandSink for RecordingSink {
    fn call_service(&mut self, call: &ServiceCall) {
        self.calls.push(call.clone());
    }
}

mod service_data {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct ServiceData<T> {
        entity_id: T,
    }

    pub(super) fn serialize<S: Serializer>(entity_id: &str, s: S) -> Result<S::Ok, S::Error> {
        ServiceData { entity_id }.serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        ServiceData::<String>::deserialize(d).map(|data| data.entity_id)
    }
}
