use crate::category::Category;
use crate::version::Version;

/// A row in the persisted topic table.
///
/// `topic_id` is always `"<version>/<category>/<page_name>"` and is unique
/// per corpus (two different `.hbk` versions can legitimately produce the
/// same `topic_id` suffix, which is exactly why the version is folded into
/// the id rather than tracked only in a separate column).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicRow {
    pub topic_id: String,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub version: String,
}

impl TopicRow {
    #[must_use]
    pub fn new(
        version: &Version,
        category: Category,
        page_name: &str,
        title: String,
        content: String,
    ) -> Self {
        Self {
            topic_id: format!("{version}/{category}/{page_name}"),
            title,
            content,
            category,
            version: version.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_id_follows_version_category_page_shape() {
        let version = Version::parse("8.3.27.1989").unwrap();
        let row = TopicRow::new(
            &version,
            Category::Syntax,
            "a.html",
            "A".to_owned(),
            "content".to_owned(),
        );
        assert_eq!(row.topic_id, "8.3.27.1989/syntax/a.html");
    }
}
