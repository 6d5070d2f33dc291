// ── Change detection ──
//
// The host pushes state on every poll even when nothing moved. A rebuild is
// only worth doing when the canonical serialization of the decoded payload
// differs from the last one rendered.

use tracing::{trace, warn};

use crate::model::RawPayload;

/// Remembers the key of the last rendered payload.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last_key: Option<String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic key for a payload. Field order is fixed by the typed
    /// model, so two pushes with the same data yield the same key regardless
    /// of how the host ordered its JSON.
    pub fn key_of(payload: &RawPayload) -> Option<String> {
        serde_json::to_string(payload)
            .inspect_err(|e| warn!(error = %e, "payload key unavailable"))
            .ok()
    }

    /// Record `payload` and report whether it differs from the previous one.
    ///
    /// A payload that cannot be keyed always counts as changed.
    pub fn check(&mut self, payload: &RawPayload) -> bool {
        let Some(key) = Self::key_of(payload) else {
            self.last_key = None;
            return true;
        };
        if self.last_key.as_deref() == Some(key.as_str()) {
            trace!("payload unchanged");
            return false;
        }
        self.last_key = Some(key);
        true
    }

    /// Forget the last key so the next payload always rebuilds.
    pub fn invalidate(&mut self) {
        self.last_key = None;
    }

    pub fn key(&self) -> Option<&str> {
        self.last_key.as_deref()
    }
}
