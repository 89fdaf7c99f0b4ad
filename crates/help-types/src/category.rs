use std::fmt;

/// Which `.hbk` container a topic came from.
///
/// ```text
/// ┌────────┬──────────────────┬────────────┐
/// │ File   │ shcntx_ru.hbk    │ Syntax     │
/// │        │ shquery_ru.hbk   │ Query      │
/// │        │ shlang_ru.hbk    │ Language   │
/// └────────┴──────────────────┴────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Syntax,
    Query,
    Language,
}

impl Category {
    /// The `.hbk` file name this category is indexed from.
    #[must_use]
    pub fn source_file(self) -> &'static str {
        match self {
            Self::Syntax => "shcntx_ru.hbk",
            Self::Query => "shquery_ru.hbk",
            Self::Language => "shlang_ru.hbk",
        }
    }

    /// All three categories, in the order the indexing pipeline processes
    /// them: syntax, then query, then language.
    #[must_use]
    pub fn all() -> [Self; 3] {
        [Self::Syntax, Self::Query, Self::Language]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Syntax => "syntax",
            Self::Query => "query",
            Self::Language => "language",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_files_are_distinct() {
        let files: Vec<_> = Category::all().iter().map(|c| c.source_file()).collect();
        assert_eq!(files, ["shcntx_ru.hbk", "shquery_ru.hbk", "shlang_ru.hbk"]);
    }
}
