//! Human-readable response text, per spec §4.9/§8 — every tool response
//! is a single Markdown-ish text block, never an RPC fault.

use chrono::{DateTime, Utc};
use help_index::SearchHit;
use help_types::IndexMeta;

pub fn store_preparing() -> String {
    "⏳ База данных справки 1С ещё подготавливается, попробуйте через несколько секунд.".to_owned()
}

pub fn store_unavailable() -> String {
    "⚠️ База данных справки 1С недоступна: платформа 1С не найдена в стандартных путях установки."
        .to_owned()
}

pub fn empty_query() -> String {
    "⚠️ Пустой запрос: укажите текст для поиска.".to_owned()
}

pub fn no_search_results(query: &str) -> String {
    format!("По запросу «{query}» ничего не найдено.")
}

pub fn search_results(query: &str, hits: &[SearchHit]) -> String {
    let mut out = format!("Результаты поиска по запросу «{query}»:\n\n");
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!(
            "## {}. {}\nID: `{}`\n\n{}\n\n",
            i + 1,
            hit.title,
            hit.topic_id,
            hit.excerpt
        ));
    }
    out
}

pub fn topic_not_found(topic_id: &str) -> String {
    format!("Тема с идентификатором «{topic_id}» не найдена.")
}

pub fn topic_body(title: &str, content: &str) -> String {
    format!("# {title}\n\n{content}")
}

pub fn no_indexed_versions() -> String {
    "Индекс не содержит проиндексированных версий.".to_owned()
}

pub fn version_status(meta: &IndexMeta) -> String {
    let version = meta.indexed_version.as_deref().unwrap_or("—");
    let count = meta.topic_count.unwrap_or(0);
    let indexed_at = meta
        .indexed_at
        .map(format_timestamp)
        .unwrap_or_else(|| "—".to_owned());

    format!(
        "## Статус индекса справки 1С\n\n\
         - Версия платформы: **{version}**\n\
         - Тем проиндексировано: **{count}**\n\
         - Последняя индексация: {indexed_at}\n"
    )
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub fn reindex_busy() -> String {
    "⏳ Индексация уже выполняется, дождитесь её завершения.".to_owned()
}

pub fn reindex_no_platform() -> String {
    "⚠️ Платформа 1С не найдена, переиндексация невозможна.".to_owned()
}

pub fn reindex_started() -> String {
    "🔄 Переиндексация запущена в фоновом режиме.".to_owned()
}

pub fn reindex_store_failure(reason: &str) -> String {
    format!("⚠️ Не удалось очистить индекс перед переиндексацией: {reason}")
}
