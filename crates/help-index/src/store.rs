use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use help_types::{Category, IndexMeta, TopicRow};
use rusqlite::{params, Connection};

use crate::error::IndexError;

/// A search result: enough to show the user and to fetch the full page
/// with [`IndexStore::get`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub topic_id: String,
    pub title: String,
    pub excerpt: String,
}

/// A single retrieved topic's full text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topic {
    pub title: String,
    pub content: String,
}

const CREATE_METADATA: &str = "CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

const CREATE_TOPICS_FTS: &str = "CREATE VIRTUAL TABLE IF NOT EXISTS topics_fts USING fts5(
    topic_id UNINDEXED,
    title,
    content,
    category UNINDEXED,
    version UNINDEXED,
    tokenize = 'unicode61'
)";

/// The content column's position within `topics_fts`, as `snippet()` and
/// `bm25()` address it by index rather than name.
const CONTENT_COLUMN: i32 = 2;

const META_KEY_VERSION: &str = "indexed_version";
const META_KEY_COUNT: &str = "topic_count";
const META_KEY_TIMESTAMP: &str = "indexed_at";

/// Whether a SQLite error is an FTS5 query-syntax rejection (as opposed to
/// a schema problem, I/O failure, or anything else that should still
/// surface to the caller).
fn is_fts5_syntax_error(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let lower = message.to_lowercase();
            lower.contains("fts5") || lower.contains("syntax error")
        }
        _ => false,
    }
}

/// A persistent, full-text-searchable store of help topics, backed by
/// SQLite's FTS5 extension.
pub struct IndexStore {
    conn: Connection,
}

impl IndexStore {
    /// Open (creating if absent) the index database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::CreateDir`] if the parent directory can't be
    /// created, or [`IndexError::Sqlite`] if the connection or schema
    /// setup fails.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| IndexError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute(CREATE_METADATA, [])?;
        conn.execute(CREATE_TOPICS_FTS, [])?;

        Ok(Self { conn })
    }

    /// Delete every topic row recorded under `version`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Sqlite`] on a database failure.
    pub fn clear_version(&self, version: &str) -> Result<(), IndexError> {
        self.conn
            .execute("DELETE FROM topics_fts WHERE version = ?1", params![version])?;
        Ok(())
    }

    /// Truncate both the topic table and the metadata table.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Sqlite`] on a database failure.
    pub fn clear_all(&self) -> Result<(), IndexError> {
        self.conn.execute("DELETE FROM topics_fts", [])?;
        self.conn.execute("DELETE FROM metadata", [])?;
        Ok(())
    }

    /// Insert `rows` atomically inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Sqlite`] on a database failure; nothing is
    /// committed if any row fails to insert.
    pub fn insert_batch(&mut self, rows: &[TopicRow]) -> Result<(), IndexError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO topics_fts (topic_id, title, content, category, version)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.topic_id,
                    row.title,
                    row.content,
                    row.category.to_string(),
                    row.version,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Count topic rows recorded under `version`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Sqlite`] on a database failure.
    pub fn count(&self, version: &str) -> Result<u64, IndexError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM topics_fts WHERE version = ?1",
            params![version],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Upsert the three metadata keys in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Sqlite`] on a database failure.
    pub fn record_meta(
        &mut self,
        version: &str,
        count: u64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), IndexError> {
        let tx = self.conn.transaction()?;
        for (key, value) in [
            (META_KEY_VERSION, version.to_owned()),
            (META_KEY_COUNT, count.to_string()),
            (META_KEY_TIMESTAMP, timestamp.to_rfc3339()),
        ] {
            tx.execute(
                "INSERT INTO metadata (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Read the current metadata row. Any field whose key is absent (or
    /// unparseable) comes back as `None` rather than erroring.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Sqlite`] on a database failure.
    pub fn read_meta(&self) -> Result<IndexMeta, IndexError> {
        let read = |key: &str| -> Result<Option<String>, IndexError> {
            let value = self
                .conn
                .query_row(
                    "SELECT value FROM metadata WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .ok();
            Ok(value)
        };

        let indexed_version = read(META_KEY_VERSION)?;
        let topic_count = read(META_KEY_COUNT)?.and_then(|v| v.parse::<u64>().ok());
        let indexed_at = read(META_KEY_TIMESTAMP)?
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(IndexMeta {
            indexed_version,
            topic_count,
            indexed_at,
        })
    }

    /// Full-text search, ranked by `bm25()`, optionally restricted to a
    /// category. Falls back to a `LIKE` substring search — transparently,
    /// with no distinct error or return shape — if the query doesn't
    /// parse as FTS5 syntax.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Sqlite`] for any database failure that isn't
    /// an FTS5 syntax rejection.
    pub fn search(
        &self,
        query: &str,
        category: Option<Category>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, IndexError> {
        let category = category.map(|c| c.to_string());
        match self.search_fts(query, category.as_deref(), limit) {
            Ok(hits) => Ok(hits),
            Err(err) if is_fts5_syntax_error(&err) => {
                self.search_like(query, category.as_deref(), limit)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn search_fts(
        &self,
        query: &str,
        category: Option<&str>,
        limit: usize,
    ) -> rusqlite::Result<Vec<SearchHit>> {
        let mut stmt = self.conn.prepare(
            "SELECT topic_id, title, snippet(topics_fts, ?1, '>>', '<<', '...', 30)
             FROM topics_fts
             WHERE topics_fts MATCH ?2
               AND (?3 IS NULL OR category = ?3)
             ORDER BY bm25(topics_fts)
             LIMIT ?4",
        )?;
        let rows = stmt.query_map(
            params![CONTENT_COLUMN, query, category, limit as i64],
            |row| {
                Ok(SearchHit {
                    topic_id: row.get(0)?,
                    title: row.get(1)?,
                    excerpt: row.get(2)?,
                })
            },
        )?;
        rows.collect()
    }

    fn search_like(
        &self,
        query: &str,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, IndexError> {
        let pattern = format!("%{query}%");
        let mut stmt = self.conn.prepare(
            "SELECT topic_id, title, substr(content, 1, 300)
             FROM topics_fts
             WHERE (title LIKE ?1 OR content LIKE ?1)
               AND (?2 IS NULL OR category = ?2)
             LIMIT ?3",
        )?;
        let rows = stmt.query_map(params![pattern, category, limit as i64], |row| {
            Ok(SearchHit {
                topic_id: row.get(0)?,
                title: row.get(1)?,
                excerpt: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Fetch one topic's full title and content.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Sqlite`] on a database failure.
    pub fn get(&self, topic_id: &str) -> Result<Option<Topic>, IndexError> {
        let topic = self
            .conn
            .query_row(
                "SELECT title, content FROM topics_fts WHERE topic_id = ?1",
                params![topic_id],
                |row| {
                    Ok(Topic {
                        title: row.get(0)?,
                        content: row.get(1)?,
                    })
                },
            )
            .ok();
        Ok(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use help_types::Category;
    use tempfile::tempdir;

    fn sample_row(topic_id: &str, title: &str, content: &str, version: &str) -> TopicRow {
        TopicRow {
            topic_id: topic_id.to_owned(),
            title: title.to_owned(),
            content: content.to_owned(),
            category: Category::Syntax,
            version: version.to_owned(),
        }
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("help.db");
        let store = IndexStore::open(&path).unwrap();
        assert_eq!(store.count("8.3.27.1989").unwrap(), 0);
    }

    #[test]
    fn insert_and_count_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        store
            .insert_batch(&[sample_row("8.3/syntax/a.html", "A", "hello world", "8.3")])
            .unwrap();
        assert_eq!(store.count("8.3").unwrap(), 1);
    }

    #[test]
    fn clear_version_only_removes_that_version() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        store
            .insert_batch(&[
                sample_row("8.3/syntax/a.html", "A", "hello", "8.3"),
                sample_row("8.2/syntax/a.html", "A", "hello", "8.2"),
            ])
            .unwrap();
        store.clear_version("8.3").unwrap();
        assert_eq!(store.count("8.3").unwrap(), 0);
        assert_eq!(store.count("8.2").unwrap(), 1);
    }

    #[test]
    fn record_and_read_meta_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        let now = Utc::now();
        store.record_meta("8.3.27.1989", 42, now).unwrap();
        let meta = store.read_meta().unwrap();
        assert_eq!(meta.indexed_version.as_deref(), Some("8.3.27.1989"));
        assert_eq!(meta.topic_count, Some(42));
        assert!(meta.indexed_at.is_some());
    }

    #[test]
    fn record_meta_upserts_rather_than_duplicating() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        store.record_meta("8.3.27.1989", 1, Utc::now()).unwrap();
        store.record_meta("8.3.27.1990", 2, Utc::now()).unwrap();
        let meta = store.read_meta().unwrap();
        assert_eq!(meta.indexed_version.as_deref(), Some("8.3.27.1990"));
        assert_eq!(meta.topic_count, Some(2));
    }

    #[test]
    fn search_finds_a_matching_word() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        store
            .insert_batch(&[sample_row(
                "8.3/syntax/a.html",
                "Массив",
                "Работа с массивами в 1С",
                "8.3",
            )])
            .unwrap();
        let hits = store.search("массив", None, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].topic_id, "8.3/syntax/a.html");
    }

    #[test]
    fn search_respects_category_filter() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        store
            .insert_batch(&[TopicRow {
                topic_id: "8.3/query/a.html".to_owned(),
                title: "Запрос".to_owned(),
                content: "текст запроса".to_owned(),
                category: Category::Query,
                version: "8.3".to_owned(),
            }])
            .unwrap();
        let hits = store.search("запрос", Some(Category::Syntax), 10).unwrap();
        assert!(hits.is_empty());
        let hits = store.search("запрос", Some(Category::Query), 10).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn search_falls_back_to_like_on_malformed_fts5_query() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        store
            .insert_batch(&[sample_row("8.3/syntax/a.html", "A", "some content", "8.3")])
            .unwrap();
        // "((" is not valid FTS5 query syntax; the fallback must not error.
        let hits = store.search("((", None, 10).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn get_returns_none_for_unknown_topic() {
        let dir = tempdir().unwrap();
        let store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn get_returns_title_and_content() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::open(&dir.path().join("help.db")).unwrap();
        store
            .insert_batch(&[sample_row("8.3/syntax/a.html", "A", "full content", "8.3")])
            .unwrap();
        let topic = store.get("8.3/syntax/a.html").unwrap().unwrap();
        assert_eq!(topic.title, "A");
        assert_eq!(topic.content, "full content");
    }
}
