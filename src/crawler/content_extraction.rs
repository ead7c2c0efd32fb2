//! Content extraction functionality for the crawler module

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Markdown images, including linked images (`[![alt](src)](href)`)
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!\[[^\]]*\]\([^)]*\)\]\([^)]*\)|!\[[^\]]*\]\([^)]*\)")
        .expect("image pattern is valid")
});

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector is valid"));

/// Remove image syntax from markdown
///
/// Lines left empty by the removal are dropped.
pub fn strip_images(markdown: &str) -> String {
    let stripped = IMAGE_RE.replace_all(markdown, "");
    let mut out = String::with_capacity(stripped.len());
    let mut last_blank = false;
    for line in stripped.lines() {
        let blank = line.trim().is_empty();
        if blank && last_blank {
            continue;
        }
        out.push_str(line.trim_end());
        out.push('\n');
        last_blank = blank;
    }
    out.trim().to_string()
}

/// Extract the page title
///
/// # Arguments
///
/// * `html` - The HTML of the page
///
/// # Returns
///
/// The trimmed contents of the first `<title>` element, if it has any text
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Collect the same-host links of a page
///
/// Relative links are resolved against `base`, fragments are removed, and
/// anything that is not http(s) or points at another host is ignored.
pub fn discover_links(base: &Url, html: &str) -> Vec<Url> {
    let document = Html::parse_document(html);
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|link| matches!(link.scheme(), "http" | "https"))
        .filter(|link| link.host_str() == base.host_str())
        .map(|mut link| {
            link.set_fragment(None);
            link
        })
        .collect()
}

/// Check if a URL points at non-content resources
///
/// # Arguments
///
/// * `url` - URL to check
/// * `patterns` - Lowercase fragments that mark a URL as non-content
pub fn should_skip_url(url: &str, patterns: &[String]) -> bool {
    let url = url.to_lowercase();
    patterns.iter().any(|pattern| url.contains(pattern.as_str()))
}

/// Key used to match discovered links with crawled pages
pub(crate) fn page_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.as_str().trim_end_matches('/').to_string()
}
