use chrono::{DateTime, Utc};

/// The metadata row: what version is indexed, how many topics it holds,
/// and when indexing last completed successfully.
///
/// All three fields are `Option` because the metadata table can be read
/// before anything has ever been indexed (a brand new `help.db`), in which
/// case every field is absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexMeta {
    pub indexed_version: Option<String>,
    pub topic_count: Option<u64>,
    pub indexed_at: Option<DateTime<Utc>>,
}

impl IndexMeta {
    /// True when there is nothing usable to serve yet — either the table
    /// has never been written, or the last run recorded zero topics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexed_version.is_none() || matches!(self.topic_count, None | Some(0))
    }
}
