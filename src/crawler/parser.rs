//! HTML parser for extracting hyperlinks
//!
//! Only anchor `href` attributes are collected, verbatim. Resolution,
//! filtering, and canonicalization are left to the [`Canonicalizer`] so
//! that every rule lives in one place.
//!
//! [`Canonicalizer`]: crate::url::Canonicalizer

use scraper::{Html, Selector};

/// Extracts the raw `href` value of every `<a href="...">` in the document
///
/// Values are returned in document order, duplicates included. Malformed
/// markup is tolerated: the parser recovers and yields whatever anchors it
/// could recognize.
///
/// # Arguments
///
/// * `html` - The rendered HTML content
///
/// # Returns
///
/// The untouched `href` attribute values
///
/// # Example
///
/// ```
/// use product_discoverer::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a name="x">No href</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
