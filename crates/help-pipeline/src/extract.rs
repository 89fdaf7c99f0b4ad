use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

/// Placeholder title used when a page has no `<h1>`, `<h2>`, or `<title>`.
const UNTITLED: &str = "Без названия";

/// Plain-text body is capped at this many bytes (not characters — the
/// source system's own limit was always a byte count).
const MAX_CONTENT_BYTES: usize = 10_000;

/// Element names whose entire subtree is dropped from the extracted text.
const EXCLUDED_TAGS: [&str; 3] = ["script", "style", "nav"];

/// Classes whose entire subtree is dropped from the extracted text.
const EXCLUDED_CLASSES: [&str; 2] = ["toc", "navigation"];

/// Title and plain-text body lifted from one help page's HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: String,
    pub text: String,
}

fn is_excluded(element: &scraper::node::Element) -> bool {
    let name = element.name();
    if EXCLUDED_TAGS.contains(&name) {
        return true;
    }
    element
        .classes()
        .any(|class| EXCLUDED_CLASSES.contains(&class))
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            if is_excluded(element) {
                return;
            }
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

/// Depth-first search for the first `<body>` element, returning its node
/// directly rather than going through `ElementRef` — `Select` iterators
/// yield `ElementRef`, which has no public way back to a borrowed
/// `NodeRef` of the underlying tree, so the body lookup walks the tree
/// itself instead of using a `Selector`.
fn find_body(node: NodeRef<'_, Node>) -> Option<NodeRef<'_, Node>> {
    if let Node::Element(element) = node.value() {
        if element.name() == "body" {
            return Some(node);
        }
    }
    node.children().find_map(find_body)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_to_byte_cap(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_owned();
    }
    let mut boundary = max_bytes;
    while boundary > 0 && !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    text[..boundary].to_owned()
}

fn extract_title(document: &Html, title_selector: &Selector) -> String {
    document
        .select(title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_owned())
}

/// Lift a title and a bounded plain-text body out of an HTML page.
///
/// The text is scoped to the `<body>` element — `<head>` (and, in
/// particular, `<title>`) is never part of the extracted text, only of the
/// separately-returned title. Falls back to the whole document only when
/// there's no `<body>` element to find (malformed or fragment HTML).
#[must_use]
pub fn extract(html: &str) -> ExtractedText {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("h1, h2, title").expect("static selector is valid");
    let title = extract_title(&document, &title_selector);

    let body_node = find_body(document.tree.root()).unwrap_or_else(|| document.tree.root());

    let mut raw_text = String::new();
    collect_text(body_node, &mut raw_text);
    let text = truncate_to_byte_cap(&collapse_whitespace(&raw_text), MAX_CONTENT_BYTES);

    ExtractedText { title, text }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_h1() {
        let extracted = extract("<html><body><h1>Массив</h1><h2>Other</h2></body></html>");
        assert_eq!(extracted.title, "Массив");
    }

    #[test]
    fn falls_back_to_title_tag() {
        let extracted = extract("<html><head><title>Заголовок</title></head><body></body></html>");
        assert_eq!(extracted.title, "Заголовок");
    }

    #[test]
    fn head_title_text_does_not_leak_into_body_content() {
        let html = "<html><head><title>Заголовок страницы</title></head>\
            <body><p>Основной текст</p></body></html>";
        let extracted = extract(html);
        assert_eq!(extracted.title, "Заголовок страницы");
        assert_eq!(extracted.text, "Основной текст");
    }

    #[test]
    fn missing_title_uses_placeholder() {
        let extracted = extract("<html><body><p>No headings here</p></body></html>");
        assert_eq!(extracted.title, UNTITLED);
    }

    #[test]
    fn strips_script_style_and_nav() {
        let html = "<html><body>\
            <script>var x = 1;</script>\
            <style>.a{color:red}</style>\
            <nav>Меню</nav>\
            <p>Полезный текст</p>\
            </body></html>";
        let extracted = extract(html);
        assert_eq!(extracted.text, "Полезный текст");
    }

    #[test]
    fn strips_toc_and_navigation_classes() {
        let html = "<html><body>\
            <div class=\"toc\">Table of contents</div>\
            <div class=\"navigation\">Next / Prev</div>\
            <p>Main content</p>\
            </body></html>";
        let extracted = extract(html);
        assert_eq!(extracted.text, "Main content");
    }

    #[test]
    fn collapses_whitespace() {
        let html = "<html><body><p>one\n\n   two\t\tthree</p></body></html>";
        let extracted = extract(html);
        assert_eq!(extracted.text, "one two three");
    }

    #[test]
    fn truncates_to_byte_cap_on_a_char_boundary() {
        // Each "я" is two bytes in UTF-8, so a naive byte-index slice would
        // risk landing mid-character.
        let long_text = "я".repeat(MAX_CONTENT_BYTES);
        let html = format!("<html><body><p>{long_text}</p></body></html>");
        let extracted = extract(&html);
        assert!(extracted.text.len() <= MAX_CONTENT_BYTES);
        assert!(extracted.text.is_char_boundary(extracted.text.len()));
    }
}
