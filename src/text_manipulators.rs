use scraper::{ElementRef, Selector};

pub fn extract_text(node: ElementRef) -> String {
    node.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element under `scope` matching `selector`, or an
/// empty string when nothing matches. Later matches are ignored, their text is
/// not joined on.
pub fn first_text(scope: ElementRef, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(extract_text)
        .unwrap_or_default()
}

/// Token `index` of `text` split on single spaces, e.g. `"Room : IT101"` at 2
/// is `"IT101"`.
pub fn space_token(text: &str, index: usize) -> Option<String> {
    text.split(' ').nth(index).map(String::from)
}
