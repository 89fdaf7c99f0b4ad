use std::sync::Arc;

use chrono::Utc;
use hbk_container::Container;
use help_index::IndexStore;
use help_types::{Category, Installation, TopicRow};
use tokio::sync::Mutex;

use crate::error::PipelineError;
use crate::extract::extract;

/// Rows accumulated before a batch is flushed to the store.
const BATCH_SIZE: usize = 100;

/// Used as the progress denominator when the first container's own page
/// estimate can't be obtained (missing file, unreadable).
const FALLBACK_TOTAL_PAGES: u64 = 1_000;

/// Emitted as the pipeline runs, so the caller (`help-server`'s status
/// module) can turn it into a `HELP_STATUS:` line without this crate
/// needing to know the line grammar itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Indexing {
        percent: u8,
        total: u64,
        message: String,
    },
    Ready {
        version: String,
        count: u64,
    },
    Unavailable {
        reason: String,
    },
}

async fn flush_batch(
    store: &Arc<Mutex<IndexStore>>,
    batch: &mut Vec<TopicRow>,
) -> Result<(), PipelineError> {
    if batch.is_empty() {
        return Ok(());
    }
    let rows = std::mem::take(batch);
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || {
        let mut guard = store.blocking_lock();
        guard.insert_batch(&rows)
    })
    .await??;
    Ok(())
}

/// Index every available corpus container for `installation` into `store`,
/// reporting progress through `on_progress`.
///
/// Missing container files are skipped, not an error. A failure opening or
/// writing the store is fatal and propagates; a failure decoding one page
/// is already absorbed inside `hbk-container` and never reaches here.
///
/// # Errors
///
/// Returns [`PipelineError::Index`] if the store can't be cleared,
/// written to, or have its metadata recorded.
pub async fn run_indexing(
    installation: &Installation,
    store: Arc<Mutex<IndexStore>>,
    mut on_progress: impl FnMut(ProgressEvent),
) -> Result<(), PipelineError> {
    let version = installation.version.to_string();

    {
        let guard = store.lock().await;
        if let Err(err) = guard.clear_version(&version) {
            on_progress(ProgressEvent::Unavailable {
                reason: err.to_string(),
            });
            return Err(err.into());
        }
    }

    let total = Category::all()
        .first()
        .and_then(|category| {
            let path = installation.container_path(category.source_file());
            Container::open(&path).ok()
        })
        .map_or(FALLBACK_TOTAL_PAGES, |container| {
            let estimate = container.estimate_page_count();
            if estimate == 0 {
                FALLBACK_TOTAL_PAGES
            } else {
                estimate
            }
        });

    let mut processed: u64 = 0;
    let mut total_rows: u64 = 0;
    let mut batch: Vec<TopicRow> = Vec::with_capacity(BATCH_SIZE);

    for category in Category::all() {
        let path = installation.container_path(category.source_file());
        if !path.exists() {
            continue;
        }
        let container = match Container::open(&path) {
            Ok(container) => container,
            Err(err) => {
                eprintln!("[1c-help] failed to open {}: {err}", path.display());
                continue;
            }
        };

        let mut pages = container.pages();
        while let Some(page) = pages.next().await {
            let extracted = extract(&page.html);
            let row = TopicRow::new(
                &installation.version,
                category,
                &page.name,
                extracted.title,
                extracted.text,
            );
            batch.push(row);
            processed += 1;

            if batch.len() >= BATCH_SIZE {
                let batch_len = batch.len() as u64;
                if let Err(err) = flush_batch(&store, &mut batch).await {
                    on_progress(ProgressEvent::Unavailable {
                        reason: err.to_string(),
                    });
                    return Err(err);
                }
                total_rows += batch_len;
            }

            let percent = ((processed as f64 / (total.max(1)) as f64) * 100.0).floor() as u64;
            on_progress(ProgressEvent::Indexing {
                percent: percent.min(99) as u8,
                total,
                message: format!("Обработано {processed} страниц..."),
            });
        }

        let remaining = batch.len() as u64;
        if let Err(err) = flush_batch(&store, &mut batch).await {
            on_progress(ProgressEvent::Unavailable {
                reason: err.to_string(),
            });
            return Err(err);
        }
        total_rows += remaining;
    }

    {
        let mut guard = store.lock().await;
        if let Err(err) = guard.record_meta(&version, total_rows, Utc::now()) {
            on_progress(ProgressEvent::Unavailable {
                reason: err.to_string(),
            });
            return Err(err.into());
        }
    }

    on_progress(ProgressEvent::Ready {
        version,
        count: total_rows,
    });

    Ok(())
}
