use std::sync::Arc;

use help_index::IndexStore;
use help_types::Installation;
use tokio::sync::{Mutex, RwLock};

/// The controller's lifecycle state, mirrored from spec §4.9.
///
/// `ReindexRequested` is never held as a standing state in this
/// implementation: `reindex_1c_help` transitions straight from `Ready`
/// to `Indexing` once it has cleared the store and spawned the
/// background pipeline, so there is no observable window where a
/// request is pending but not yet running. The variant is kept so the
/// state machine documents every state the spec names, even though one
/// of them collapses to an instant rather than a held phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NoPlatform,
    Indexing,
    Ready,
    ReindexRequested,
}

impl Phase {
    #[must_use]
    pub fn is_indexing(self) -> bool {
        matches!(self, Self::Indexing | Self::ReindexRequested)
    }
}

/// Shared state between the RPC-serving task and the background indexing
/// task: the current phase and the (optionally absent) open index handle.
///
/// `store` is `None` only when no installation was discovered at startup
/// (`Phase::NoPlatform`) — in every other phase the handle is opened
/// before the phase transitions away from `NoPlatform`, since indexing
/// itself needs somewhere to write.
#[derive(Clone)]
pub struct AppState {
    pub phase: Arc<RwLock<Phase>>,
    pub store: Option<Arc<Mutex<IndexStore>>>,
    pub installation: Option<Installation>,
}

impl AppState {
    #[must_use]
    pub fn new(phase: Phase, store: Option<Arc<Mutex<IndexStore>>>, installation: Option<Installation>) -> Self {
        Self {
            phase: Arc::new(RwLock::new(phase)),
            store,
            installation,
        }
    }

    pub async fn current_phase(&self) -> Phase {
        *self.phase.read().await
    }

    pub async fn set_phase(&self, phase: Phase) {
        *self.phase.write().await = phase;
    }
}
