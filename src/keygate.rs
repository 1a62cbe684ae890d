//! Credential-selection side channel.
//!
//! Some hosts can tell whether the user has picked a usable API key and can
//! raise a key-selection prompt. The orchestrator consults this gate
//! opportunistically before high-fidelity and video requests and reactively
//! on auth-like failures. The gate is advisory: whatever it reports, the
//! workflow proceeds.

use async_trait::async_trait;
use tracing::warn;

/// Host capability for API-key selection.
#[async_trait]
pub trait KeyGate: Send + Sync {
    /// Whether a usable credential is currently selected.
    async fn has_selected_key(&self) -> Result<bool, String>;

    /// Ask the user to select a credential.
    async fn open_select_key(&self);
}

/// Default gate used when the host supplies none: a credential is assumed
/// present and the selection prompt is a no-op.
pub struct AssumePresentGate;

#[async_trait]
impl KeyGate for AssumePresentGate {
    async fn has_selected_key(&self) -> Result<bool, String> {
        Ok(true)
    }

    async fn open_select_key(&self) {}
}

/// Run the advisory pre-flight check: if the gate reports no selected key,
/// prompt for selection first, then proceed either way. Gate failures are
/// logged and treated as "assume present".
pub async fn ensure_key(gate: &dyn KeyGate) {
    match gate.has_selected_key().await {
        Ok(true) => {}
        Ok(false) => gate.open_select_key().await,
        Err(e) => warn!("api key selection check failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct RecordingGate {
        has_key: bool,
        fail_check: bool,
        prompted: AtomicU32,
    }

    #[async_trait]
    impl KeyGate for RecordingGate {
        async fn has_selected_key(&self) -> Result<bool, String> {
            if self.fail_check {
                return Err("host hiccup".into());
            }
            Ok(self.has_key)
        }

        async fn open_select_key(&self) {
            self.prompted.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn ensure_key_prompts_only_when_no_key_selected() {
        let gate = RecordingGate {
            has_key: false,
            fail_check: false,
            prompted: AtomicU32::new(0),
        };
        ensure_key(&gate).await;
        assert_eq!(gate.prompted.load(Ordering::SeqCst), 1);

        let gate = RecordingGate {
            has_key: true,
            fail_check: false,
            prompted: AtomicU32::new(0),
        };
        ensure_key(&gate).await;
        assert_eq!(gate.prompted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ensure_key_tolerates_gate_failure() {
        let gate = RecordingGate {
            has_key: false,
            fail_check: true,
            prompted: AtomicU32::new(0),
        };
        // Failure is advisory; no prompt, no panic.
        ensure_key(&gate).await;
        assert_eq!(gate.prompted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn default_gate_assumes_present() {
        assert_eq!(AssumePresentGate.has_selected_key().await, Ok(true));
    }
}
