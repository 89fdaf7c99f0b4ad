/// One HTML page lifted from the file-storage ZIP entity.
///
/// Produced lazily by `hbk-container::Container::pages()` and consumed
/// immediately by the indexing pipeline — a `Page` is never retained after
/// its text has been extracted and committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    pub html: String,
}

impl Page {
    #[must_use]
    pub fn new(name: String, html: String) -> Self {
        Self { name, html }
    }
}
