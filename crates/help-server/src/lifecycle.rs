use std::path::PathBuf;
use std::sync::Arc;

use help_index::IndexStore;
use help_pipeline::{run_indexing, ProgressEvent};
use help_types::Installation;
use tokio::sync::Mutex;

use crate::state::{AppState, Phase};
use crate::status;

/// Fallback total used in the initial `indexing:0:1000:...` line emitted
/// before the pipeline has had a chance to estimate a real total.
const STARTUP_FALLBACK_TOTAL: u64 = 1_000;

/// Resolve the directory the index database lives in: the first defined
/// of `APPDATA`/`HOME`, else `dirs::home_dir()`, else the system temp
/// directory, appended with `com.mini-ai-1c/help`.
#[must_use]
pub fn resolve_index_dir() -> PathBuf {
    let base = std::env::var_os("APPDATA")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);
    base.join("com.mini-ai-1c").join("help")
}

/// `resolve_index_dir()/help.db`, creating the directory if absent.
///
/// # Errors
///
/// Returns an error if the directory can't be created.
pub fn index_db_path() -> anyhow::Result<PathBuf> {
    let dir = resolve_index_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("help.db"))
}

fn meta_is_current(meta: &help_types::IndexMeta, installation: &Installation) -> bool {
    !meta.is_empty() && meta.indexed_version.as_deref() == Some(installation.version.to_string().as_str())
}

/// Run the startup sequence from spec §4.9: discover a platform
/// installation, open (or create) the index database, and decide whether
/// a fresh indexing run is needed before serving tool calls.
///
/// # Errors
///
/// Returns an error only for a catastrophic failure opening the index
/// store — a missing platform installation is not an error, it's the
/// `Phase::NoPlatform` branch.
pub async fn startup() -> anyhow::Result<AppState> {
    let Some(installation) = help_discovery::discover() else {
        status::unavailable(Some("1C Platform not found in standard paths"));
        return Ok(AppState::new(Phase::NoPlatform, None, None));
    };

    let db_path = index_db_path()?;
    let db_existed = db_path.exists();
    let mut store = IndexStore::open(&db_path)?;

    let needs_indexing = if db_existed {
        match store.read_meta() {
            Ok(meta) if meta_is_current(&meta, &installation) => false,
            Ok(_) => {
                store.clear_all()?;
                true
            }
            Err(err) => {
                status::log(&format!("failed to read index metadata, reindexing: {err}"));
                store.clear_all()?;
                true
            }
        }
    } else {
        true
    };

    let store = Arc::new(Mutex::new(store));

    if !needs_indexing {
        let count = {
            let guard = store.lock().await;
            guard.read_meta()?.topic_count.unwrap_or(0)
        };
        status::ready(&installation.version.to_string(), count);
        return Ok(AppState::new(Phase::Ready, Some(store), Some(installation)));
    }

    status::indexing(0, STARTUP_FALLBACK_TOTAL, "Запуск индексации...");
    let state = AppState::new(Phase::Indexing, Some(store), Some(installation.clone()));
    spawn_indexing(state.clone(), installation);
    Ok(state)
}

/// What happened when a `reindex_1c_help` call was dispatched.
pub enum ReindexOutcome {
    Started,
    AlreadyIndexing,
    NoPlatform,
    StoreFailure(String),
}

/// Service a `reindex_1c_help` call: clear the store and launch a fresh
/// background indexing run, unless one is already in flight or there is
/// no installation to index from.
pub async fn trigger_reindex(state: &AppState) -> ReindexOutcome {
    if state.current_phase().await.is_indexing() {
        return ReindexOutcome::AlreadyIndexing;
    }
    let (Some(installation), Some(store)) = (state.installation.clone(), state.store.clone()) else {
        return ReindexOutcome::NoPlatform;
    };

    if let Err(err) = store.lock().await.clear_all() {
        return ReindexOutcome::StoreFailure(err.to_string());
    }

    state.set_phase(Phase::Indexing).await;
    status::indexing(0, STARTUP_FALLBACK_TOTAL, "Запуск индексации...");
    spawn_indexing(state.clone(), installation);
    ReindexOutcome::Started
}

fn spawn_indexing(state: AppState, installation: Installation) {
    tokio::spawn(async move {
        let Some(store) = state.store.clone() else {
            return;
        };

        let result = run_indexing(&installation, store, |event| match event {
            ProgressEvent::Indexing {
                percent,
                total,
                message,
            } => status::indexing(percent, total, &message),
            ProgressEvent::Ready { version, count } => status::ready(&version, count),
            ProgressEvent::Unavailable { reason } => status::unavailable(Some(&reason)),
        })
        .await;

        if let Err(err) = result {
            status::log(&format!("indexing run failed: {err}"));
        }
        state.set_phase(Phase::Ready).await;
    });
}
